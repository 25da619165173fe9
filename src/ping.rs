use anyhow::{Context, Result};
use tokio::process::Command;

/// One ICMP probe via the system `ping`, returning the average round trip in
/// whole milliseconds, or `None` when the host did not answer.
pub async fn ping_once(host: &str) -> Result<Option<u64>> {
    let output = Command::new("ping")
        .args(["-c", "1", host])
        .output()
        .await
        .context("spawn ping")?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_avg_ms(&stdout))
}

/// Pull the avg figure out of the summary line both Linux and BSD ping end
/// with: `rtt min/avg/max/mdev = 12.3/15.1/19.0/2.1 ms`.
pub fn parse_avg_ms(output: &str) -> Option<u64> {
    let line = output.lines().rev().find(|l| l.contains('='))?;
    let stats = line.rsplit('=').next()?.trim();
    let avg = stats.split_whitespace().next()?.split('/').nth(1)?;
    avg.parse::<f64>().ok().map(|ms| ms.round() as u64)
}

#[cfg(test)]
#[path = "tests/ping_tests.rs"]
mod tests;
