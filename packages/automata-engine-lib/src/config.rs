use crate::logger::LogLevel;

pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

/// Declares a config struct together with a `Partial*` twin in which every
/// field is optional. The partial struct is what gets deserialized, missing
/// fields fall back to the declared defaults.
///
/// ```ignore
/// config! {
///     pub struct Example {
///         retries: u32 = 3,
///         nested: Inner [PartialInner] = Inner::default(),
///     }
/// }
/// ```
///
/// A nested config names its partial type in brackets.
#[macro_export]
macro_rules! config {
    (@partial $ty:ty) => { $ty };
    (@partial $ty:ty, $partial:ty) => { $partial };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty $([$partial:ty])? = $default:expr
            ),* $(,)?
        }
    ) => {
        ::paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, serde::Serialize)]
            $vis struct $name {
                $( $(#[$field_meta])* $field: $ty, )*
            }

            #[derive(Debug, Clone, Default, serde::Deserialize)]
            $vis struct [<Partial $name>] {
                $( $field: Option<$crate::config!(@partial $ty $(, $partial)?)>, )*
            }

            impl $name {
                pub fn from_partial(partial: [<Partial $name>]) -> Self {
                    use $crate::config::IntoOr;
                    Self {
                        $( $field: partial.$field.into_or($default), )*
                    }
                }

                pub fn from_file<P: AsRef<std::path::Path>>(file_path: P) -> anyhow::Result<Self> {
                    let content = std::fs::read_to_string(file_path.as_ref())?;
                    Ok(Self::from_partial(toml::from_str(&content)?))
                }

                pub fn from_optional_file<P: AsRef<std::path::Path>>(
                    file_path: Option<P>,
                ) -> anyhow::Result<Self> {
                    match file_path {
                        Some(p) => Self::from_file(p),
                        None => Ok(Self::default()),
                    }
                }

                $(
                    pub fn [<with_ $field>](mut self, $field: $ty) -> Self {
                        self.$field = $field;
                        self
                    }

                    pub fn [<set_ $field>](&mut self, $field: $ty) {
                        self.$field = $field;
                    }

                    pub fn [<get_ $field>](&self) -> &$ty {
                        &self.$field
                    }
                )*
            }

            impl Default for $name {
                fn default() -> Self {
                    Self {
                        $( $field: $default, )*
                    }
                }
            }

            impl $crate::config::IntoOr<$name> for Option<[<Partial $name>]> {
                fn into_or(self, or: $name) -> $name {
                    match self {
                        Some(partial) => $name::from_partial(partial),
                        None => or,
                    }
                }
            }
        }
    };
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    /// Bounds for the epsilon closure pass of pushdown automata. Without
    /// them an epsilon transition that keeps pushing would never stop.
    pub struct PdaLimits {
        /// Epsilon transitions fired in one closure pass.
        max_epsilon_iterations: usize = 1000,
        /// Symbols allowed on the stack above the bottom marker.
        max_stack_growth: usize = 1000,
    }
}

config! {
    pub struct EngineConfig {
        pda: PdaLimits [PartialPdaLimits] = PdaLimits::default(),
        logger: LoggerConfig [PartialLoggerConfig] = LoggerConfig::default(),
    }
}
