use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::{self, State};
use crate::emit;
use crate::git::GitCli;
use crate::resolver::{self, RunMeta};

// -h is taken by --header, so the automatic help flag is replaced with a
// long-only one.
pub fn build_cli() -> Command {
    Command::new("vstamp")
        .about("Stamp git version metadata into build artifacts")
        .version(env!("VSTAMP_VERSION_STRING"))
        .disable_help_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .action(ArgAction::Help)
                .help("Print help"),
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .required(true)
                .help("Name of the project"),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_name("DIR")
                .help("Root path of the project (where to find .git)"),
        )
        .arg(
            Arg::new("header")
                .short('h')
                .long("header")
                .value_name("FILE")
                .help("Write a C header declaring the version symbols"),
        )
        .arg(
            Arg::new("cfile")
                .short('s')
                .long("cfile")
                .value_name("FILE")
                .help("Write a C source file defining the version symbols"),
        )
        .arg(
            Arg::new("cmake")
                .short('C')
                .long("cmake")
                .value_name("FILE")
                .help("Write a cmake file setting the version variables"),
        )
        .arg(
            Arg::new("touch")
                .short('t')
                .long("touch")
                .value_name("FILE")
                .help("Touch this file once all other files are written"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Write the full version string to this file"),
        )
        .arg(
            Arg::new("conf")
                .short('c')
                .long("conf")
                .value_name("FILE")
                .help("State file to track builds (default: <home>/.<name>.yaml)"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let name = matches.get_one::<String>("name").unwrap();
    let repo_dir = matches.get_one::<String>("path").map(PathBuf::from);

    let state_path = match matches.get_one::<String>("conf") {
        Some(p) => PathBuf::from(p),
        None => config::default_state_path(name)?,
    };

    let mut state = State::load_from(&state_path);
    let vcs = GitCli::new(repo_dir);
    let resolution = resolver::resolve(&mut state, name, RunMeta::capture(), &vcs);

    if let Some(p) = matches.get_one::<String>("header") {
        emit::write_if_changed(Path::new(p), &emit::render_header(name))?;
    }
    if let Some(p) = matches.get_one::<String>("cfile") {
        emit::write_if_changed(
            Path::new(p),
            &emit::render_source(&resolution.versions, &resolution.hash, &state),
        )?;
    }
    if let Some(p) = matches.get_one::<String>("cmake") {
        let cmake = emit::render_cmake(name, &resolution.versions, &resolution.hash, &state);
        fs::write(p, cmake).with_context(|| format!("writing {}", p))?;
    }
    if let Some(p) = matches.get_one::<String>("file") {
        let line = format!("{}\n", resolution.versions.version4);
        fs::write(p, line).with_context(|| format!("writing {}", p))?;
    }

    state
        .save_to(&state_path)
        .with_context(|| format!("saving state to {}", state_path.display()))?;

    // Touch runs last so dependents of the target see every artifact.
    if let Some(p) = matches.get_one::<String>("touch") {
        emit::touch(Path::new(p))?;
    }

    Ok(())
}
