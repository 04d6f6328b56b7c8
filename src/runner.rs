use std::io;
use std::path::PathBuf;

use clap::{Args, Command, FromArgMatches as _};
use log::{info, LevelFilter};

use crate::community::ContextCommunityExt;
use crate::context::Context;
use crate::error::EpidemicError;
use crate::loader::load_community_file;
use crate::log::set_log_level;
use crate::parameters::{load_parameters_file, CommunityParameters};
use crate::random::ContextRandomExt;
use crate::report::{write_community_listing, write_community_reports};

/// Command line arguments
#[derive(Args, Debug, Default)]
pub struct BaseArgs {
    /// Community description file
    pub community: Option<PathBuf>,

    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// JSON parameters file, read instead of a community description
    #[arg(short, long, conflicts_with = "community")]
    pub config: Option<PathBuf>,

    /// Directory for CSV reports
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print every person and place before the simulation starts
    #[arg(short, long)]
    pub list: bool,

    /// Enable logging at this level (error, warn, info, debug or trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[must_use]
pub fn create_cli() -> Command {
    let cli = Command::new("epidemic")
        .about("Synthesizes a community and simulates its workplaces opening and closing");
    BaseArgs::augment_args(cli)
}

/// Runs a simulation configured from the command line.
///
/// # Errors
///
/// Returns an error if the arguments cannot be parsed or the run cannot be set up.
pub fn run_with_args() -> Result<Context, Box<dyn std::error::Error>> {
    let matches = create_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    Ok(run_with_args_internal(args)?)
}

fn load_parameters(args: &BaseArgs) -> Result<CommunityParameters, EpidemicError> {
    match (&args.community, &args.config) {
        (Some(path), _) => load_community_file(path).map_err(|error| match error {
            EpidemicError::IoError(_) => {
                EpidemicError::EpidemicError(format!("Can't open file: {}", path.display()))
            }
            error => error,
        }),
        (None, Some(path)) => load_parameters_file(path),
        (None, None) => Err("Missing file name argument".into()),
    }
}

/// Loads the parameters, synthesizes the community and runs until the end time.
///
/// Nothing is simulated if any step of the setup fails.
///
/// # Errors
///
/// Returns an `EpidemicError` if the log level is invalid, the parameters cannot be loaded, or a
/// report cannot be written.
pub fn run_with_args_internal(args: BaseArgs) -> Result<Context, EpidemicError> {
    if let Some(level) = &args.log_level {
        let level: LevelFilter = level
            .parse()
            .map_err(|_| format!("invalid log level: {level}"))?;
        set_log_level(level);
    }

    let parameters = load_parameters(&args)?;

    let mut context = Context::new();
    context.init_random(args.random_seed);

    // Scheduled before the workplaces, so it wins any tie.
    context.add_plan(parameters.end_time, Context::shutdown);
    context.synthesize_community(&parameters);

    if let Some(output_dir) = &args.output_dir {
        write_community_reports(&mut context, output_dir)?;
    }
    if args.list {
        if let Some(community) = context.get_community() {
            write_community_listing(community, &mut io::stdout().lock())?;
        }
    }

    context.execute();
    info!("simulation ended at time {}", context.get_current_time());
    Ok(context)
}
