use hostsfmt::parse::{comb_ipaddr, maybe_hostname_alias};
use nom::bytes::complete::{tag, take_while1};
use nom::combinator::{eof, map};
use nom::sequence::{separated_pair, terminated};
use nom::IResult;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Eq, PartialEq)]
pub enum Action {
    Define(IpAddr, String),
}

#[derive(Debug, StructOpt)]
#[structopt(settings = & [structopt::clap::AppSettings::ColoredHelp])]
pub struct HostsArgs {
    /// Will make no change and simply output what would have changed.
    #[structopt(short = "n", long = "dry-run")]
    pub dry_run: bool,
    /// Will output generated hosts file to stdout and log in more detail
    #[structopt(short = "v", long = "verbose")]
    pub verbose: bool,
    /// Will generate a sample configuration on stdout
    #[structopt(long = "sample-config")]
    pub generate_sample_config: bool,
    /// Hosts file to read
    #[structopt(short = "f", long = "file", parse(from_os_str))]
    pub file: Option<PathBuf>,
    /// Where to write the canonical hosts file, defaults to the file that was read
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    pub output: Option<PathBuf>,
    /// Configuration file in YAML format
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Actions are additions to hosts that should be made. Prefix with `--` to stop other
    /// argument parsing!
    ///
    /// IP+=host -> Define an entry, host gets added to the names of IP. Existing mappings of
    ///             the same hostname to other addresses are left alone.
    ///
    /// IP can be any IPv4 or IPv6 IP. Actions will be processed in the order provided.
    #[structopt(parse(try_from_str = try_parse_action),
    verbatim_doc_comment,
    help = "Defines intended additions to hosts file. use `--help` for full description.",
    name="ACTIONS")]
    pub actions: Vec<Action>,
}

fn try_parse_action(str_action: &str) -> Result<Action, String> {
    comb_action(str_action)
        .map_err(|err| format!("unable to parse action {:?}: {}", str_action, err))
        .map(|(_, action)| action)
}

fn comb_action(input: &str) -> IResult<&str, Action> {
    map(
        terminated(
            separated_pair(comb_ipaddr, tag("+="), take_while1(maybe_hostname_alias)),
            eof,
        ),
        |(ip, host): (IpAddr, &str)| Action::Define(ip, host.to_string()),
    )(input)
}
