//! Library-level integration tests.
//!
//! These chain the member crates the way the CLI does, without spawning
//! the binary: config -> ingest -> domain -> render -> aggregate.

mod pipeline;
mod roundtrip;

use perfverdict_config::{ConfigFormat, parse_config, resolve_report_config};
use perfverdict_types::{ReportConfig, SampleTable};

pub(crate) const CONFIG: &str = r#"
[defaults]
round = 2
round_pct = 2
fillna = "NaN"

[[keys]]
name = "RW"
from = "rw"

[[keys]]
name = "BS"
from = "bs"
unit = "KiB"

[[kpis]]
name = "IOPS"
from = "iops"

[[kpis]]
name = "LAT"
from = "lat"
unit = "ms"
higher_is_better = false
"#;

pub(crate) const BASE: &str = "\
rw,bs,iops,lat
read,4,1000,1.00
read,4,1010,1.01
read,4,990,0.99
write,4,500,2.00
write,4,505,2.02
write,4,495,1.98
";

/// Read unchanged; write regresses on both KPIs.
pub(crate) const TEST_FAIL: &str = "\
rw,bs,iops,lat
read,4,1000,1.00
read,4,1010,1.01
read,4,990,0.99
write,4,300,3.0
write,4,303,3.03
write,4,297,2.97
";

pub(crate) fn config(text: &str) -> ReportConfig {
    let file = parse_config(text, ConfigFormat::Toml).expect("config should parse");
    resolve_report_config(&file).expect("config should resolve")
}

pub(crate) fn table(name: &str, csv: &str) -> SampleTable {
    perfverdict_ingest::read_csv(name, csv).expect("table should parse")
}
