//! HSRP Redundancy Check Demo
//!
//! Polls a redundant pair of routers for `show standby brief`, parses
//! the output with the bundled template, and validates that every HSRP
//! group is in the expected active/standby configuration across the
//! pair, printing a JSON report.
//!
//! No live devices are required: the primary sources here always fail,
//! so the fallback sample output is used, exactly as a real deployment
//! would fall back when a device is unreachable.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --example hsrp_check
//! ```

use linefsm::check::{HsrpReport, HsrpRole, PeerExpectation, STANDBY_BRIEF_TEMPLATE};
use linefsm::{FallbackSource, LineSource, SourceError, Template};

/// Sample `show standby brief` output for the first customer edge router.
const OUTPUT_CE1: &str = "
Interface   Grp  Pri P State   Active          Standby         Virtual IP
Gi0/1         1  150   Active  local           192.168.1.2     192.168.1.253
Gi0/1         2  100   Standby 192.168.1.1     local           192.168.1.254
";

/// Sample output for the second router: the mirror configuration.
const OUTPUT_CE2: &str = "
Interface   Grp  Pri P State   Active          Standby         Virtual IP
Gi0/1         1  100   Standby 192.168.1.1     local           192.168.1.253
Gi0/1         2  150   Active  local           192.168.1.2     192.168.1.254
";

const COMMAND: &str = "show standby brief";

/// Stand-in for an SSH-backed source whose device is unreachable.
fn unreachable_device(host: &'static str) -> impl LineSource {
    move |command: &str| {
        Err::<String, _>(SourceError::Retrieval {
            message: format!("connection to {host} timed out running '{command}'"),
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== HSRP Redundancy Check ===\n");

    let template = Template::compile(STANDBY_BRIEF_TEMPLATE)?;

    // CE1 leads group 1 and backs up group 2; CE2 is the exact inverse.
    let ce1 = PeerExpectation::new("CE1")
        .with_group("1", HsrpRole::Active)
        .with_group("2", HsrpRole::Standby);
    let ce2 = ce1.inverted("CE2");

    let peers = [
        (ce1, "10.100.15.1", OUTPUT_CE1),
        (ce2, "10.100.15.2", OUTPUT_CE2),
    ];

    let mut report = HsrpReport::new();
    for (expectation, host, sample) in peers {
        println!("Checking {} ({host})...", expectation.name());

        let mut source = FallbackSource::new(unreachable_device(host), sample);
        let output = source.fetch(COMMAND)?;

        let result = template.parse_text(&output)?;
        println!("  parsed {} HSRP group(s)", result.len());

        report.push_peer(expectation.name(), expectation.check(&result));
    }

    println!("\n{}", report.to_json_pretty()?);
    Ok(())
}
