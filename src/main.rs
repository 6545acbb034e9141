#![deny(missing_docs)]
//! Command line tool for bringing the hosts file on Linux/UNIX into canonical form and adding
//! static hostname-IP mappings to it.
//!
//! The whole file is read into a table holding one entry per address. Host names are lower-cased
//! and deduplicated, entries for the same address are merged. The result is written back with
//! one line per address, names and lines sorted. Comments are dropped.
//!
//! ## Engineered for Safety
//!
//! A single malformed line makes the tool refuse to touch the file at all. Host names may only be
//! added if they are on the whitelist of the configuration, and some key entries that might
//! affect correct function of software like `localhost` cannot be pointed to other addresses.
//!
//! When not running as root the tool forces dry-run mode for the system hosts file.

#[macro_use]
extern crate structopt;

mod config;
mod opts;

use crate::config::{reserved_conflict, HostsfmtConfig};
use crate::opts::Action;
use anyhow::{bail, Context};
use hostsfmt::{parse_hosts, write_entry_set_with, write_path_with, Entry, EntrySet, HostTable};
use std::fs::File;
use std::io::{stdout, BufReader, ErrorKind};
use std::path::Path;
use structopt::StructOpt;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const PATH_HOSTSFILE: &str = "/etc/hosts";

const PATH_CONFIG: &str = "/etc/hostsfmt.yaml";

fn main() {
    let mut opts: opts::HostsArgs = {
        let app: structopt::clap::App = opts::HostsArgs::clap();
        let str_about = format!(
            r##"Tool for bringing the system wide hosts file into canonical form and adding entries to it.

Expects a hosts file at {:?} (or given by --file) and a configuration in YAML format at {:?}
(or given by --config).

Every line of the hosts file has to be empty, a comment, or an IP address followed by host
names. Otherwise the file is left alone. The file is rewritten with one line per IP address,
host names lower-cased and sorted, lines sorted. Comments are not preserved!

The configuration defines a whitelist of hostnames that can be added. This program will refuse
to add any hostname not present in that list. It will also ensure that certain hostnames never
point to other addresses than their usual ones:
- {:?}
- {:?}
- {:?}
- {:?}
- {:?}
- <current hostname>

The only exception is if the config variable `enable_dangerous_operations` is set to true."##,
            PATH_HOSTSFILE,
            PATH_CONFIG,
            config::RESERVED_LOCALHOST,
            config::RESERVED_IP6_LOCALHOST,
            config::RESERVED_IP6_LOOPBACK,
            config::RESERVED_IP6_ALLNODES,
            config::RESERVED_IP6_ALLROUTERS,
        );
        let app = app.about(str_about.as_ref());
        opts::HostsArgs::from_clap(&app.get_matches())
    };

    init_tracing(opts.verbose);

    if let Err(err) = run(&mut opts) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(opts: &mut opts::HostsArgs) -> anyhow::Result<()> {
    if opts.generate_sample_config {
        let mut out = stdout();
        let mut sample = HostsfmtConfig::default();
        sample.whitelist.insert("somerandomhost.with.tld".into());
        serde_yaml::to_writer(&mut out, &sample)
            .context("unable to write default config to stdout")?;
        return Ok(());
    }

    let path_hosts = opts
        .file
        .clone()
        .unwrap_or_else(|| Path::new(PATH_HOSTSFILE).to_path_buf());
    let path_output = opts.output.clone().unwrap_or_else(|| path_hosts.clone());

    let euid = users::get_effective_uid();
    if euid != 0 && path_output == Path::new(PATH_HOSTSFILE) {
        warn!("not effectively root, forced dry-run mode");
        opts.dry_run = true;
    }

    let cfg = load_config(opts.config.as_deref().unwrap_or_else(|| Path::new(PATH_CONFIG)))?;
    debug!(config = ?cfg, "loaded configuration");

    let str_content = std::fs::read_to_string(&path_hosts)
        .with_context(|| format!("unable to read hosts file {:?}", path_hosts))?;
    let mut entries = parse_hosts(&str_content)
        .with_context(|| format!("unable to parse contents of hosts file {:?}", path_hosts))?;

    if opts.dry_run || opts.verbose {
        println!("original contents:\n>>>\n{}<<<", str_content);
    }

    let hostname_os_string = hostname::get().context("unable to determine system hostname")?;
    let hostname = hostname_os_string
        .to_str()
        .context("system hostname is not a valid UTF-8 string")?;

    perform_actions(&opts.actions, &mut entries, &cfg, hostname)?;

    let style = cfg.style;
    let mut buf_generate = Vec::with_capacity(str_content.len());
    write_entry_set_with(&entries, &mut buf_generate, |entry: &Entry| style.render(entry))
        .context("unable to render hosts file")?;
    let buf_generate = String::from_utf8(buf_generate).context("rendered invalid UTF-8")?;

    if opts.dry_run || opts.verbose {
        println!("generated:\n>>>\n{}<<<", &buf_generate);
    }
    if opts.dry_run {
        println!("DRY-RUN DRY-RUN DRY-RUN DRY-RUN DRY-RUN DRY-RUN DRY-RUN DRY-RUN DRY-RUN DRY-RUN DRY-RUN DRY-RUN");
        println!("hosts file not modified");
        return Ok(());
    }

    if path_output == path_hosts && buf_generate == str_content {
        info!("no changes, not modifying hosts file");
        return Ok(());
    }

    write_path_with(&entries, &path_output, |entry: &Entry| style.render(entry))
        .with_context(|| format!("unable to write hosts file {:?}", path_output))?;
    info!(path = %path_output.display(), entries = entries.len(), "hosts file written");
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<HostsfmtConfig> {
    match File::open(path) {
        Ok(file) => serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("unable to parse configuration {:?}", path)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "no configuration found, nothing is whitelisted");
            Ok(HostsfmtConfig::default())
        }
        Err(err) => Err(err).with_context(|| format!("unable to open config file {:?}", path)),
    }
}

fn perform_actions(
    actions: &[Action],
    entries: &mut EntrySet,
    config: &HostsfmtConfig,
    hostname: &str,
) -> anyhow::Result<()> {
    for action in actions {
        match action {
            Action::Define(ip, host) => {
                if !config.is_whitelisted(host) {
                    bail!("HOST {:?} not whitelisted!", host);
                }
                if !config.enable_dangerous_operations {
                    if let Some(reserved) = reserved_conflict(ip, host, hostname) {
                        bail!(
                            "HOST {:?} is reserved for {:?}, refusing to map it to {:?}",
                            host,
                            reserved.ip,
                            ip
                        );
                    }
                }
                let entry = Entry::new(*ip, &[host])?;
                if entries.contains(&entry) {
                    debug!(%ip, %host, "already defined");
                    continue;
                }
                info!(%ip, %host, "defining");
                entries.add_entry(&entry);
            }
        }
    }
    Ok(())
}
