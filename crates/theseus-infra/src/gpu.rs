//! GPU memory probe via `nvidia-smi`.
//!
//! The probe is strictly best-effort: a missing tool, a failing invocation,
//! or unparseable output all yield [`VramStats::default()`] (0 used of a
//! nominal total) rather than an error.

use tokio::process::Command;
use tracing::debug;

use theseus_types::gpu::VramStats;

/// Query current GPU memory usage.
pub async fn probe_vram() -> VramStats {
    probe_with("nvidia-smi").await
}

async fn probe_with(tool: &str) -> VramStats {
    let output = match Command::new(tool)
        .args([
            "--query-gpu=memory.used,memory.total",
            "--format=csv,noheader,nounits",
        ])
        .output()
        .await
    {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            debug!(tool, status = %output.status, "GPU query failed, using default");
            return VramStats::default();
        }
        Err(err) => {
            debug!(tool, error = %err, "GPU query tool unavailable, using default");
            return VramStats::default();
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_vram_line(&stdout).unwrap_or_default()
}

/// Parse the first line of `used, total` comma-separated megabyte values.
fn parse_vram_line(output: &str) -> Option<VramStats> {
    let line = output.lines().next()?;
    let mut parts = line.split(',');
    let used_mb = parts.next()?.trim().parse().ok()?;
    let total_mb = parts.next()?.trim().parse().ok()?;
    Some(VramStats { used_mb, total_mb })
}

#[cfg(test)]
mod tests {
    use super::*;
    use theseus_types::gpu::DEFAULT_VRAM_TOTAL_MB;

    #[test]
    fn test_parse_vram_line() {
        let stats = parse_vram_line("3542, 16384\n").unwrap();
        assert_eq!(stats.used_mb, 3542);
        assert_eq!(stats.total_mb, 16_384);
    }

    #[test]
    fn test_parse_takes_first_gpu_only() {
        let stats = parse_vram_line("1024, 8192\n2048, 8192\n").unwrap();
        assert_eq!(stats.used_mb, 1024);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_vram_line("").is_none());
        assert!(parse_vram_line("N/A, N/A").is_none());
        assert!(parse_vram_line("just one field").is_none());
    }

    #[tokio::test]
    async fn test_missing_tool_yields_safe_default() {
        let stats = probe_with("theseus-no-such-gpu-tool").await;
        assert_eq!(stats.used_mb, 0);
        assert_eq!(stats.total_mb, DEFAULT_VRAM_TOTAL_MB);
    }
}
