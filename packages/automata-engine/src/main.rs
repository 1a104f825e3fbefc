use std::{fmt::Display, str::FromStr};

use anyhow::{Context, bail};
use automata_engine_lib::{
    automaton::{
        AnyExecution, Automaton, GraphAutomaton, dfa::minimization::MinimizationResult,
        epsilon_nfa::EpsilonNfa,
    },
    config::EngineConfig,
    execution::Halt,
    logger::{LogLevel, Logger},
};
use clap::Parser;
use serde::Serialize;

/// What to do with the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Run,
    Regex,
    Minimize,
    Convert,
    Validate,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "run" => Ok(Mode::Run),
            "regex" => Ok(Mode::Regex),
            "minimize" => Ok(Mode::Minimize),
            "convert" => Ok(Mode::Convert),
            "validate" => Ok(Mode::Validate),
            _ => Err(format!("Invalid mode: {}", s)),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Run => write!(f, "run"),
            Mode::Regex => write!(f, "regex"),
            Mode::Minimize => write!(f, "minimize"),
            Mode::Convert => write!(f, "convert"),
            Mode::Validate => write!(f, "validate"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "Automata Engine")]
#[command(version = "0.1")]
#[command(about = "Run, convert and minimize finite and pushdown automata", long_about = None)]
struct Args {
    /// An automaton JSON file, or the pattern in regex mode.
    source: String,

    /// Inputs to run the automaton on.
    inputs: Vec<String>,

    #[arg(short, long, default_value_t = Mode::Run)]
    mode: Mode,

    #[arg(short, long)]
    config: Option<String>,

    /// Record the configuration after every step.
    #[arg(short, long)]
    trace: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceStep {
    position: usize,
    configuration: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunResult {
    input: String,
    accepted: bool,
    position: usize,
    halt: Option<Halt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<TraceStep>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegexOutput {
    automaton: Automaton,
    results: Vec<RunResult>,
}

fn load_automaton(path: &str) -> anyhow::Result<Automaton> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse automaton in {path}"))
}

fn run(automaton: &Automaton, input: &str, trace: bool) -> RunResult {
    let mut execution = automaton.start_execution(input);
    let mut steps = vec![step_of(&execution)];

    while !execution.is_finished() {
        automaton.step_forward(&mut execution);
        steps.push(step_of(&execution));
    }

    RunResult {
        input: input.to_string(),
        accepted: execution.is_accepted().unwrap_or(false),
        position: execution.position(),
        halt: execution.halt(),
        trace: trace.then_some(steps),
    }
}

fn step_of(execution: &AnyExecution) -> TraceStep {
    TraceStep {
        position: execution.position(),
        configuration: execution.configuration_label(),
    }
}

fn run_all(
    automaton: &Automaton,
    inputs: &[String],
    trace: bool,
    logger: Option<&Logger>,
) -> anyhow::Result<Vec<RunResult>> {
    automaton
        .graph()
        .validate_start_state()
        .context("the automaton cannot be executed")?;

    Ok(inputs
        .iter()
        .map(|input| {
            let result = run(automaton, input, trace);
            if let Some(logger) = logger {
                logger
                    .object("Run")
                    .add_field("input", format!("{input:?}"))
                    .add_field("accepted", result.accepted)
                    .add_field("position", result.position)
                    .log(LogLevel::Debug);
            }
            result
        })
        .collect())
}

fn minimize(automaton: &Automaton) -> anyhow::Result<MinimizationResult> {
    let Automaton::Dfa(dfa) = automaton else {
        bail!("only a DFA can be minimized, got a {}", automaton.kind().label());
    };

    dfa.graph()
        .validate_start_state()
        .context("the DFA cannot be minimized")?;

    Ok(dfa.minimize_with_report())
}

fn convert(automaton: &Automaton) -> anyhow::Result<Automaton> {
    automaton
        .graph()
        .validate_start_state()
        .with_context(|| format!("the {} cannot be converted", automaton.kind().label()))?;

    Ok(match automaton {
        Automaton::Nfa(nfa) => Automaton::from(nfa.to_dfa()),
        Automaton::EpsilonNfa(nfa) => Automaton::from(nfa.to_nfa()),
        other => bail!("a {} has no conversion", other.kind().label()),
    })
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = EngineConfig::from_optional_file(args.config.as_ref())
        .context("failed to load the configuration")?;

    let logger = Logger::from_config(config.get_logger(), "Engine".into())?;
    if let Some(logger) = &logger {
        tracing_subscriber::fmt()
            .with_max_level(logger.level().as_tracing_level())
            .with_writer(std::io::stderr)
            .init();
        logger.info(&format!("mode {}", args.mode));
    }

    if args.mode == Mode::Regex {
        let nfa = EpsilonNfa::from_regex(&args.source)
            .with_context(|| format!("failed to compile {:?}", args.source))?;
        let automaton = Automaton::from(nfa);
        let results = run_all(&automaton, &args.inputs, args.trace, logger.as_ref())?;
        return print_json(&RegexOutput { automaton, results });
    }

    let mut automaton = load_automaton(&args.source)?;
    if let Automaton::Pda(pda) = &mut automaton {
        pda.set_limits(config.get_pda().clone());
    }

    let issues = automaton.validate();
    if let Some(logger) = &logger {
        for issue in &issues {
            logger.warn(issue);
        }
    }

    match args.mode {
        Mode::Run => print_json(&run_all(
            &automaton,
            &args.inputs,
            args.trace,
            logger.as_ref(),
        )?),
        Mode::Minimize => {
            let result = minimize(&automaton)?;
            eprintln!("{}", result.report());
            print_json(&result)
        }
        Mode::Convert => print_json(&convert(&automaton)?),
        Mode::Validate => print_json(&issues),
        Mode::Regex => unreachable!("regex mode is handled before loading a file"),
    }
}
