/**
 * Angular SCAM Schematic - ng-scam
 *
 * Generates a component and its NgModule in a single file
 */
use std::process;

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use ng_scam::config::AngularConfig;
use ng_scam::file_system::{AbsoluteFsPath, NodeJSFileSystem, PathManipulation};
use ng_scam::scam::{MergeOutcome, ScamDefaults, ScamOptions, ScamSchematic, Style};
use ng_scam::tree::Tree;

fn main() {
    let matches = command().get_matches();
    init_logger(matches.get_count("verbose"));

    if let Err(err) = run(&matches) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn command() -> Command {
    Command::new("ng-scam")
        .version(ng_scam::version())
        .about("Generate a component and its module in a single file (SCAM)")
        .arg(
            Arg::new("name")
                .required(true)
                .value_name("NAME")
                .help("Name of the component, e.g. greetings/HelloWorld"),
        )
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .value_name("PROJECT")
                .help("Project to generate into (defaults to the workspace default project)"),
        )
        .arg(
            Arg::new("path")
                .long("path")
                .value_name("DIR")
                .help("Directory, relative to the workspace root, overriding the project's default path"),
        )
        .arg(bool_flag("separate-module", "Keep the module in its own file"))
        .arg(bool_flag("skip-tests", "Do not create a spec file"))
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .value_name("PREFIX")
                .help("Selector prefix"),
        )
        .arg(
            Arg::new("selector")
                .long("selector")
                .value_name("SELECTOR")
                .help("Full selector, overriding the prefix"),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .value_name("STYLE")
                .value_parser(PossibleValuesParser::new(Style::VALUES))
                .help("Stylesheet format"),
        )
        .arg(bool_flag("inline-style", "Put styles in the component file"))
        .arg(bool_flag("inline-template", "Put the template in the component file"))
        .arg(
            Arg::new("workspace")
                .long("workspace")
                .value_name("FILE")
                .help("Path to angular.json (searched upwards from the current directory by default)"),
        )
        .arg(
            Arg::new("dry-run")
                .short('d')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report the changes without writing them"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
}

/// `--flag`, `--flag=true` and `--flag=false`; absent means "not set".
fn bool_flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("BOOL")
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
        .value_parser(clap::value_parser!(bool))
        .help(help)
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn defaults_from_args(matches: &ArgMatches) -> anyhow::Result<ScamDefaults> {
    let style = matches
        .get_one::<String>("style")
        .map(|style| style.parse::<Style>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    Ok(ScamDefaults {
        separate_module: matches.get_one::<bool>("separate-module").copied(),
        skip_tests: matches.get_one::<bool>("skip-tests").copied(),
        style,
        prefix: matches.get_one::<String>("prefix").cloned(),
        inline_style: matches.get_one::<bool>("inline-style").copied(),
        inline_template: matches.get_one::<bool>("inline-template").copied(),
    })
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let fs = NodeJSFileSystem::new();

    let workspace_file = match matches.get_one::<String>("workspace") {
        Some(path) => AbsoluteFsPath::from(
            std::fs::canonicalize(path).with_context(|| format!("cannot access {}", path))?,
        ),
        None => AngularConfig::find(&fs, &fs.pwd())?,
    };
    let config = AngularConfig::load(&fs, &workspace_file)?;
    let root = AbsoluteFsPath::new(fs.dirname(workspace_file.as_str()));

    let project = matches.get_one::<String>("project").cloned();
    let defaults = config
        .schematic_defaults(project.as_deref())
        .overlay(defaults_from_args(matches)?);

    let name = matches
        .get_one::<String>("name")
        .cloned()
        .unwrap_or_default();
    let mut options = ScamOptions::with_defaults(name, defaults);
    options.project = project;
    options.path = matches.get_one::<String>("path").cloned();
    options.selector = matches.get_one::<String>("selector").cloned();

    let mut tree = Tree::new(&fs, root);
    let outcome = ScamSchematic::default().run(&mut tree, &config, &options)?;

    if let MergeOutcome::Skipped {
        expected_module_path,
    } = &outcome.merge
    {
        eprintln!(
            "Warning: {} was not found, component and module were left in separate files.",
            expected_module_path.trim_start_matches('/')
        );
    }

    for action in tree.actions() {
        println!("{}", action);
    }

    if matches.get_flag("dry-run") {
        println!();
        println!("NOTE: The \"dry-run\" flag means no changes were made.");
    } else {
        tree.commit()?;
    }
    Ok(())
}
