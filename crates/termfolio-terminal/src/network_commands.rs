//! Simulated network commands: ping, nmap.
//!
//! Nothing here touches the network. Latencies, open ports and timings come
//! from the environment's RNG, so a seeded session replays identically.

use rand::Rng;
use regex::Regex;
use termfolio_types::error::{Result, TermfolioError, usage};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// Register network commands (ping, nmap) into a registry.
pub fn register_network_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(PingCmd));
    reg.register(Box::new(NmapCmd));
}

/// Dotted IPv4 quad or a dotted host name with an alphabetic TLD.
const TARGET_PATTERN: &str = r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$|^(?:(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9\-]*[a-zA-Z0-9])\.)+(?:[A-Za-z]|[A-Za-z][A-Za-z0-9\-]*[A-Za-z0-9])$";

fn is_valid_target(target: &str) -> Result<bool> {
    let re = Regex::new(TARGET_PATTERN).map_err(|e| TermfolioError::HandlerFault(e.to_string()))?;
    Ok(re.is_match(target))
}

// ---------------------------------------------------------------------------
// ping
// ---------------------------------------------------------------------------

const MAX_PING_COUNT: u32 = 100;

struct PingCmd;
impl Command for PingCmd {
    fn name(&self) -> &str {
        "ping"
    }
    fn description(&self) -> &str {
        "Send ICMP packets to target"
    }
    fn usage(&self) -> &str {
        "ping [-c count] <destination>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(usage(self.usage()));
        }
        let mut count: u32 = 4;
        let mut destination = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match *arg {
                "-c" => {
                    let raw = iter.next().ok_or_else(|| {
                        TermfolioError::InvalidArgument(
                            "ping: option requires an argument -- 'c'".to_string(),
                        )
                    })?;
                    count = raw
                        .parse()
                        .ok()
                        .filter(|n| (1..=MAX_PING_COUNT).contains(n))
                        .ok_or_else(|| {
                            TermfolioError::InvalidArgument(format!(
                                "ping: invalid count: '{raw}' (expected 1-{MAX_PING_COUNT})"
                            ))
                        })?;
                },
                opt if opt.starts_with('-') => {
                    return Err(TermfolioError::InvalidArgument(format!(
                        "ping: unrecognized option: {opt}"
                    )));
                },
                target => destination = Some(target),
            }
        }

        let Some(dest) = destination else {
            return Err(TermfolioError::InvalidArgument(
                "ping: no destination specified".to_string(),
            ));
        };
        if !is_valid_target(dest)? {
            return Err(TermfolioError::InvalidArgument(format!(
                "ping: {dest}: Name or service not known"
            )));
        }

        let mut lines = vec![format!("PING {dest} 56(84) bytes of data.")];
        let (mut total, mut min, mut max) = (0u32, u32::MAX, 0u32);
        for seq in 1..=count {
            let time: u32 = env.rng.gen_range(20..100);
            total += time;
            min = min.min(time);
            max = max.max(time);
            lines.push(format!(
                "64 bytes from {dest}: icmp_seq={seq} ttl=64 time={time} ms"
            ));
        }
        let avg = (f64::from(total) / f64::from(count)).round();
        let mdev = (f64::from(max - min) / 4.0).round();
        lines.push(String::new());
        lines.push(format!("--- {dest} ping statistics ---"));
        lines.push(format!(
            "{count} packets transmitted, {count} received, 0% packet loss, time {}ms",
            count * 1000
        ));
        lines.push(format!("rtt min/avg/max/mdev = {min}/{avg}/{max}/{mdev} ms"));
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// nmap
// ---------------------------------------------------------------------------

/// Ports a scan reports first when they fall inside the requested range.
const COMMON_PORTS: [u16; 7] = [21, 22, 80, 443, 3306, 8080, 8443];

fn service_for(port: u16) -> (&'static str, &'static str) {
    match port {
        21 => ("ftp", "vsftpd 3.0.3"),
        22 => ("ssh", "OpenSSH 8.2p1 Ubuntu 4ubuntu0.5"),
        80 => ("http", "Apache httpd 2.4.41"),
        443 => ("https", "nginx 1.18.0"),
        3306 => ("mysql", "MySQL 8.0.27-0ubuntu0.20.04.1"),
        8080 => ("http-proxy", "Apache Tomcat"),
        8443 => ("https-alt", "Jetty 9.4.39.v20210325"),
        _ => ("unknown", "unknown"),
    }
}

/// Parse `N` or `N-M` into an inclusive range of valid TCP ports.
fn parse_port_range(spec: &str) -> Result<(u16, u16)> {
    let bad = || TermfolioError::InvalidArgument(format!("nmap: invalid port range: {spec}"));
    let (lo, hi) = match spec.split_once('-') {
        Some((lo, hi)) => (lo, hi),
        None => (spec, spec),
    };
    let lo: u16 = lo.parse().map_err(|_| bad())?;
    let hi: u16 = hi.parse().map_err(|_| bad())?;
    if lo == 0 || lo > hi {
        return Err(bad());
    }
    Ok((lo, hi))
}

fn pick_open_ports(rng: &mut impl Rng, lo: u16, hi: u16) -> Vec<u16> {
    let wanted = rng.gen_range(2..=6);
    let mut open = Vec::with_capacity(wanted);
    for i in 0..wanted {
        let port = match COMMON_PORTS.get(i) {
            Some(&p) if (lo..=hi).contains(&p) => p,
            _ => rng.gen_range(lo..=hi),
        };
        if !open.contains(&port) {
            open.push(port);
        }
    }
    open.sort_unstable();
    open
}

struct NmapCmd;
impl Command for NmapCmd {
    fn name(&self) -> &str {
        "nmap"
    }
    fn description(&self) -> &str {
        "Network exploration tool and security / port scanner"
    }
    fn usage(&self) -> &str {
        "nmap [-sS] [-sV] [-A] [-p range] <target>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(TermfolioError::InvalidArgument(format!(
                "Usage: {}\n\
                 -sS: TCP SYN scan (stealth)\n\
                 -sV: Service version detection\n\
                 -p:  Ports to scan (e.g. -p 1-100)\n\
                 -A:  Aggressive scan (OS, version, traceroute)",
                self.usage()
            )));
        }

        let (mut syn, mut versions, mut aggressive) = (false, false, false);
        let mut ports = "1-1000";
        let mut target = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match *arg {
                "-sS" => syn = true,
                "-sV" => versions = true,
                "-A" => aggressive = true,
                "-p" => {
                    ports = iter.next().copied().ok_or_else(|| {
                        TermfolioError::InvalidArgument(
                            "nmap: option -p requires an argument".to_string(),
                        )
                    })?;
                },
                opt if opt.starts_with('-') => {
                    return Err(TermfolioError::InvalidArgument(format!(
                        "nmap: unrecognized option '{opt}'"
                    )));
                },
                t => target = Some(t),
            }
        }

        let Some(target) = target else {
            return Err(TermfolioError::InvalidArgument(
                "nmap: no target specified".to_string(),
            ));
        };
        if !is_valid_target(target)? {
            return Err(TermfolioError::InvalidArgument(format!(
                "nmap: Failed to resolve \"{target}\"."
            )));
        }
        let (lo, hi) = parse_port_range(ports)?;
        let open = pick_open_ports(&mut *env.rng, lo, hi);
        let show_versions = versions || aggressive;

        let mut lines = vec!["Starting Nmap 7.80 ( https://nmap.org )".to_string()];
        if syn {
            lines.push("Initiating SYN Stealth Scan".to_string());
        }
        lines.push(format!("Nmap scan report for {target}"));
        lines.push(format!(
            "Host is up (0.0{}s latency).",
            env.rng.gen_range(10..100)
        ));
        let scanned = usize::from(hi - lo) + 1;
        lines.push(format!("Not shown: {} closed ports", scanned - open.len()));
        lines.push(if show_versions {
            format!("{:<9} {:<5} {:<11} VERSION", "PORT", "STATE", "SERVICE")
        } else {
            format!("{:<9} {:<5} SERVICE", "PORT", "STATE")
        });
        for port in &open {
            let (service, version) = service_for(*port);
            let port_col = format!("{port}/tcp");
            lines.push(if show_versions {
                format!("{port_col:<9} {:<5} {service:<11} {version}", "open")
            } else {
                format!("{port_col:<9} {:<5} {service}", "open")
            });
        }
        if aggressive {
            lines.push("OS details: Linux 5.4.0-89-generic (Ubuntu 20.04)".to_string());
            lines.push(format!("Network Distance: {} hops", env.rng.gen_range(1..=5)));
        }
        lines.push(format!(
            "Nmap done: 1 IP address (1 host up) scanned in {}.{:02} seconds",
            env.rng.gen_range(5..15),
            env.rng.gen_range(0..100)
        ));
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Harness;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn listed_ports(out: &str) -> Vec<u16> {
        out.lines()
            .filter_map(|l| l.split_once("/tcp"))
            .filter_map(|(p, _)| p.parse().ok())
            .collect()
    }

    #[test]
    fn target_validation() {
        assert!(is_valid_target("192.168.1.1").unwrap());
        assert!(is_valid_target("example.com").unwrap());
        assert!(is_valid_target("sub.example-site.org").unwrap());
        assert!(!is_valid_target("localhost").unwrap());
        assert!(!is_valid_target("bad_host!").unwrap());
        assert!(!is_valid_target("example.123").unwrap());
    }

    #[test]
    fn ping_default_four_packets() {
        let mut h = Harness::new();
        let out = h.ok("ping example.com");
        assert!(out.starts_with("PING example.com 56(84) bytes of data."));
        assert_eq!(out.matches("icmp_seq=").count(), 4);
        assert!(out.contains("4 packets transmitted, 4 received, 0% packet loss, time 4000ms"));
    }

    #[test]
    fn ping_latencies_in_range_and_stats_consistent() {
        let mut h = Harness::new();
        let out = h.ok("ping -c 10 10.0.0.1");
        let times: Vec<u32> = out
            .lines()
            .filter_map(|l| l.split("time=").nth(1))
            .filter_map(|t| t.trim_end_matches(" ms").parse().ok())
            .collect();
        assert_eq!(times.len(), 10);
        assert!(times.iter().all(|t| (20..100).contains(t)));
        let stats = out.lines().last().unwrap();
        let min = times.iter().min().unwrap();
        let max = times.iter().max().unwrap();
        assert!(stats.starts_with(&format!("rtt min/avg/max/mdev = {min}/")));
        assert!(stats.contains(&format!("/{max}/")));
    }

    #[test]
    fn ping_errors() {
        let mut h = Harness::new();
        assert!(h.err("ping").starts_with("Usage: ping"));
        assert!(h.err("ping -c abc example.com").contains("invalid count"));
        assert!(h.err("ping -c 0 example.com").contains("invalid count"));
        assert!(h.err("ping -c 101 example.com").contains("invalid count"));
        assert!(h.err("ping -c").contains("requires an argument"));
        assert!(h.err("ping -x example.com").contains("unrecognized option"));
        assert_eq!(h.err("ping nohost"), "ping: nohost: Name or service not known");
        assert_eq!(h.err("ping -c 2"), "ping: no destination specified");
    }

    #[test]
    fn nmap_default_range() {
        let mut h = Harness::new();
        let out = h.ok("nmap scanme.nmap.org");
        assert!(out.contains("Nmap scan report for scanme.nmap.org"));
        let ports = listed_ports(&out);
        assert!((2..=6).contains(&ports.len()));
        assert!(ports.iter().all(|p| (1..=1000).contains(p)));
        assert!(ports.windows(2).all(|w| w[0] < w[1]));
        assert!(out.contains(&format!("Not shown: {} closed ports", 1000 - ports.len())));
        assert!(!out.contains("VERSION"));
    }

    #[test]
    fn nmap_custom_range_stays_inside() {
        let mut h = Harness::new();
        let out = h.ok("nmap -p 20-25 10.0.0.5");
        let ports = listed_ports(&out);
        assert!(ports.contains(&21));
        assert!(ports.iter().all(|p| (20..=25).contains(p)));
        assert!(out.contains(&format!("Not shown: {} closed ports", 6 - ports.len())));
    }

    #[test]
    fn nmap_versions_and_aggressive() {
        let mut h = Harness::new();
        let out = h.ok("nmap -sV -p 22 example.com");
        assert!(out.contains("VERSION"));
        assert!(out.contains("22/tcp    open  ssh         OpenSSH 8.2p1"));
        let out = h.ok("nmap -A -sS example.com");
        assert!(out.contains("Initiating SYN Stealth Scan"));
        assert!(out.contains("OS details: Linux 5.4.0-89-generic"));
        assert!(out.contains(" hops"));
    }

    #[test]
    fn nmap_errors() {
        let mut h = Harness::new();
        assert!(h.err("nmap").starts_with("Usage: nmap"));
        assert_eq!(h.err("nmap -sV"), "nmap: no target specified");
        assert_eq!(h.err("nmap nohost"), "nmap: Failed to resolve \"nohost\".");
        assert!(h.err("nmap -p abc example.com").contains("invalid port range"));
        assert!(h.err("nmap -p 90-10 example.com").contains("invalid port range"));
        assert!(h.err("nmap -p").contains("requires an argument"));
    }

    #[test]
    fn seeded_scans_replay() {
        let a = pick_open_ports(&mut StdRng::seed_from_u64(9), 1, 1000);
        let b = pick_open_ports(&mut StdRng::seed_from_u64(9), 1, 1000);
        assert_eq!(a, b);
        assert!(a.contains(&21) && a.contains(&22));
    }
}
