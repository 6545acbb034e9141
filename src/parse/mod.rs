//! Line level codec: classifies and parses single lines of a hosts file and renders entries back
//! into lines.

use crate::entry::{canonical_ip, Entry, HostEntry, COMMENT_SIGN};
use crate::error::HostsError;
use nom::bytes::complete::{tag, take_till, take_while1};
use nom::combinator::{all_consuming, map_res, opt, rest};
use nom::multi::separated_list1;
use nom::sequence::{preceded, tuple};
use nom::{AsChar, IResult};
use std::net::IpAddr;
use std::str::FromStr;

/// Separator between address and host names in canonical lines.
pub const SEPARATOR: &str = "  ";

/// Width of the address column for [`render_line_aligned`].
pub const ALIGNED_IP_WIDTH: usize = 20;

/// Classification of a single line of a hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostsLine<'a> {
    /// An address followed by at least one host name, optionally with a trailing comment. The
    /// comment is kept for inspection only and never rendered.
    Entry(Entry, Option<&'a str>),
    /// A line holding nothing but a comment, text after the `#` character.
    Comment(&'a str),
    /// A line holding only whitespace.
    Empty,
}

impl<'a> HostsLine<'a> {
    /// Checks whether the line contributes no entry.
    pub fn is_skipped(&self) -> bool {
        !matches!(self, HostsLine::Entry(..))
    }

    /// Returns the entry of an entry line.
    pub fn into_entry(self) -> Option<Entry> {
        match self {
            HostsLine::Entry(entry, _) => Some(entry),
            _ => None,
        }
    }
}

fn maybe_ip_addr(chr: char) -> bool {
    chr.is_hex_digit() || chr == ':' || chr == '.'
}

/// Characters accepted in host names given on the command line: alphanumerics, `-`, `_` and `.`.
pub fn maybe_hostname_alias(chr: char) -> bool {
    chr.is_alphanumeric() || chr == '-' || chr == '_' || chr == '.'
}

fn is_space(chr: char) -> bool {
    chr.is_ascii_whitespace()
}

fn is_token(chr: char) -> bool {
    !is_space(chr)
}

/// Parses an IPv4 or IPv6 address.
pub fn comb_ipaddr(input: &str) -> IResult<&str, IpAddr> {
    map_res(take_while1(maybe_ip_addr), IpAddr::from_str)(input)
}

fn comb_comment(input: &str) -> IResult<&str, &str> {
    preceded(tag("#"), rest)(input)
}

fn comb_line(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    tuple((take_till(|chr: char| chr == COMMENT_SIGN), opt(comb_comment)))(input)
}

fn comb_tokens(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(take_while1(is_space), take_while1(is_token))(input)
}

/// Parses one line of a hosts file, with or without its line terminator.
///
/// Whitespace-only lines and comment lines are not errors, they are classified as
/// [`HostsLine::Empty`] and [`HostsLine::Comment`]. Anything else has to be an address followed
/// by host names: a single token fails with [`HostsError::InvalidLine`], a first token that is no
/// IP literal with [`HostsError::InvalidAddress`].
pub fn parse_line(raw: &str) -> Result<HostsLine<'_>, HostsError> {
    let trimmed = raw.trim_matches(is_space);
    if trimmed.is_empty() {
        return Ok(HostsLine::Empty);
    }

    let (_, (content, comment)) =
        comb_line(trimmed).map_err(|_| HostsError::InvalidLine(raw.to_string()))?;
    let content = content.trim_matches(is_space);
    if content.is_empty() {
        return Ok(HostsLine::Comment(comment.unwrap_or_default()));
    }

    let tokens = match all_consuming(comb_tokens)(content) {
        Ok((_, tokens)) if tokens.len() >= 2 => tokens,
        _ => return Err(HostsError::InvalidLine(raw.to_string())),
    };

    let (_, ip) = all_consuming(comb_ipaddr)(tokens[0])
        .map_err(|_| HostsError::InvalidAddress(tokens[0].to_string()))?;
    let entry = Entry::new(ip, &tokens[1..])?;
    Ok(HostsLine::Entry(entry, comment))
}

/// Parses one line and returns its entry, `None` for empty and comment lines.
pub fn parse_entry(raw: &str) -> Result<Option<Entry>, HostsError> {
    parse_line(raw).map(HostsLine::into_entry)
}

fn checked_host_names<E>(entry: &E) -> Result<Vec<String>, HostsError>
where
    E: HostEntry + ?Sized,
{
    let hosts = entry.host_names();
    if hosts.is_empty() {
        return Err(HostsError::EmptyHostNameList(entry.ip()));
    }
    if let Some(host) = hosts.iter().find(|host| host.contains(COMMENT_SIGN)) {
        return Err(HostsError::InvalidHostName(host.clone()));
    }
    Ok(hosts)
}

/// Renders an entry as canonical line `<address>  <name1>  <name2>`, names sorted, without a
/// line terminator.
pub fn render_line<E>(entry: &E) -> Result<String, HostsError>
where
    E: HostEntry + ?Sized,
{
    let hosts = checked_host_names(entry)?;
    let mut buf = canonical_ip(entry.ip()).to_string();
    for host in &hosts {
        buf.push_str(SEPARATOR);
        buf.push_str(host);
    }
    Ok(buf)
}

/// Renders an entry with the address padded to a fixed column, followed by a tab and the host
/// names separated by single spaces.
pub fn render_line_aligned<E>(entry: &E) -> Result<String, HostsError>
where
    E: HostEntry + ?Sized,
{
    let hosts = checked_host_names(entry)?;
    Ok(format!(
        "{:width$}\t{}",
        canonical_ip(entry.ip()).to_string(),
        hosts.join(" "),
        width = ALIGNED_IP_WIDTH
    ))
}

#[cfg(test)]
mod tests {
    use crate::entry::{Entry, HostEntry};
    use crate::error::HostsError;
    use crate::parse::{
        comb_ipaddr, parse_entry, parse_line, render_line, render_line_aligned, HostsLine,
    };
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
    use std::str::FromStr;

    #[test]
    fn test_parse_empty_and_comment_lines() {
        for line in &["", "    ", "\t\r\n", "\n"] {
            assert_eq!(HostsLine::Empty, parse_line(line).unwrap(), "line {:?}", line);
        }
        for (line, comment) in &[
            ("# ", ""),
            (" # ", ""),
            ("    #", ""),
            ("    #     ", ""),
            ("# just a comment", " just a comment"),
            ("#10.0.0.1 disabled.host", "10.0.0.1 disabled.host"),
        ] {
            assert_eq!(
                HostsLine::Comment(*comment),
                parse_line(line).unwrap(),
                "line {:?}",
                line
            );
        }
    }

    #[test]
    fn test_parse_invalid_lines() {
        for line in &[
            "123# ",
            " 123# ",
            "123",
            "    123",
            "    234#",
            "    234#     ",
            "nonsense",
            "127.0.0.1",
            "127.0.0.1 # localhost",
        ] {
            match parse_line(line) {
                Err(HostsError::InvalidLine(raw)) => assert_eq!(*line, raw),
                other => panic!("expected invalid line for {:?}, found {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_parse_invalid_address() {
        for (line, token) in &[
            ("300.1.1.1 host", "300.1.1.1"),
            ("localhost 127.0.0.1", "localhost"),
            ("1.2.3 host", "1.2.3"),
            ("fe80::1%eth0 host", "fe80::1%eth0"),
        ] {
            match parse_line(line) {
                Err(HostsError::InvalidAddress(found)) => assert_eq!(*token, found),
                other => panic!("expected invalid address for {:?}, found {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_parse_rejects_unicode_whitespace_in_name() {
        let name = "a\u{a0}b";
        for line in &["1.2.3.4 a\u{a0}b", "1.2.3.4 ok a\u{a0}b # trailing"] {
            match parse_line(line) {
                Err(HostsError::InvalidHostName(found)) => assert_eq!(name, found),
                other => panic!("expected invalid host name for {:?}, found {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_parse_valid_lines() {
        let localhost = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
        let cases: &[(&str, &[&str])] = &[
            ("127.0.0.1 localhost", &["localhost"]),
            ("127.0.0.1 localhost#", &["localhost"]),
            ("127.0.0.1 localhost #", &["localhost"]),
            ("127.0.0.1 localhost # ", &["localhost"]),
            ("127.0.0.1 localhost#ignore me", &["localhost"]),
            ("127.0.0.1 localhost # ignore me", &["localhost"]),
            ("127.0.0.1\tlocalhost\n", &["localhost"]),
            ("127.0.0.1 localhost example.com", &["example.com", "localhost"]),
            (
                "       127.0.0.1        localhost       Example.com # ignore",
                &["example.com", "localhost"],
            ),
        ];
        for (line, hosts) in cases {
            let entry = parse_entry(line)
                .unwrap()
                .unwrap_or_else(|| panic!("no entry for {:?}", line));
            assert_eq!(localhost, entry.ip(), "line {:?}", line);
            assert_eq!(*hosts, entry.host_names().as_slice(), "line {:?}", line);
        }
    }

    #[test]
    fn test_parse_keeps_trailing_comment() {
        let parsed = parse_line("192.168.1.1 foo # bar baz").unwrap();
        let expected = Entry::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)), &["foo"]).unwrap();
        assert_eq!(HostsLine::Entry(expected, Some(" bar baz")), parsed);
        assert!(!parsed.is_skipped());
        assert!(parse_line("# bar").unwrap().is_skipped());
    }

    #[test]
    fn test_parse_ipv6() {
        let entry = parse_entry("::1 localhost ip6-localhost ip6-loopback")
            .unwrap()
            .unwrap();
        assert_eq!(IpAddr::V6(Ipv6Addr::LOCALHOST), entry.ip());
        assert_eq!(
            vec!["ip6-localhost", "ip6-loopback", "localhost"],
            entry.host_names()
        );
        let entry = parse_entry("ff02::2 ip6-allrouters").unwrap().unwrap();
        assert_eq!(
            IpAddr::V6(Ipv6Addr::from_str("ff02::2").unwrap()),
            entry.ip()
        );
    }

    #[test]
    fn test_comb_ipaddr() {
        let (remainder, ip) = comb_ipaddr("10.0.0.1+=host").unwrap();
        assert_eq!("+=host", remainder);
        assert_eq!(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), ip);
        assert!(comb_ipaddr("300.0.0.1").is_err());
        assert!(comb_ipaddr("host").is_err());
    }

    #[test]
    fn test_render_line() {
        let entry = Entry::parse("127.0.0.1", &["localhost", "Example.com"]).unwrap();
        assert_eq!(
            "127.0.0.1  example.com  localhost",
            render_line(&entry).unwrap()
        );
        let entry = Entry::parse("::1", &["localhost"]).unwrap();
        assert_eq!("::1  localhost", render_line(&entry).unwrap());
    }

    #[test]
    fn test_render_line_without_hosts() {
        let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
        match render_line(&Entry::with_ip(ip)) {
            Err(HostsError::EmptyHostNameList(found)) => assert_eq!(ip, found),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            render_line_aligned(&Entry::with_ip(ip)),
            Err(HostsError::EmptyHostNameList(_))
        ));
    }

    struct Unchecked(Vec<String>);

    impl HostEntry for Unchecked {
        fn ip(&self) -> IpAddr {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }

        fn host_names(&self) -> Vec<String> {
            self.0.clone()
        }

        fn add_host_name(&mut self, host_name: &str) -> Result<(), HostsError> {
            self.0.push(host_name.to_string());
            Ok(())
        }

        fn contains(&self, host_name: &str) -> bool {
            self.0.iter().any(|host| host == host_name)
        }
    }

    #[test]
    fn test_render_line_rejects_comment_sign() {
        let mut entry = Unchecked(vec![]);
        entry.add_host_name("fine").unwrap();
        entry.add_host_name("not#fine").unwrap();
        match render_line(&entry) {
            Err(HostsError::InvalidHostName(host)) => assert_eq!("not#fine", host),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    struct Mapped;

    impl HostEntry for Mapped {
        fn ip(&self) -> IpAddr {
            IpAddr::V6(Ipv4Addr::new(10, 1, 2, 3).to_ipv6_mapped())
        }

        fn host_names(&self) -> Vec<String> {
            vec!["mapped".to_string()]
        }

        fn add_host_name(&mut self, _host_name: &str) -> Result<(), HostsError> {
            Ok(())
        }

        fn contains(&self, host_name: &str) -> bool {
            host_name == "mapped"
        }
    }

    #[test]
    fn test_render_ipv4_mapped_as_ipv4() {
        assert_eq!("10.1.2.3  mapped", render_line(&Mapped).unwrap());
        assert_eq!(
            "10.1.2.3            \tmapped",
            render_line_aligned(&Mapped).unwrap()
        );
        let entry = parse_entry("::ffff:10.1.2.3 Mapped").unwrap().unwrap();
        assert_eq!("10.1.2.3  mapped", render_line(&entry).unwrap());
    }

    #[test]
    fn test_render_line_aligned() {
        let entry = Entry::parse("10.0.20.4", &["intranet", "b.example"]).unwrap();
        assert_eq!(
            "10.0.20.4           \tb.example intranet",
            render_line_aligned(&entry).unwrap()
        );
    }

    #[test]
    fn test_render_then_parse() {
        let entry = Entry::parse("2001:db8::7", &["a.example", "b.example"]).unwrap();
        let line = render_line(&entry).unwrap();
        assert_eq!(Some(entry.clone()), parse_entry(&line).unwrap());
        let line = render_line_aligned(&entry).unwrap();
        assert_eq!(Some(entry), parse_entry(&line).unwrap());
    }
}
