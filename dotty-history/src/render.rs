use std::{collections::HashSet, io, path::PathBuf, process::Stdio, time::Duration};

use regex::Regex;
use tokio::{io::AsyncWriteExt, process::Command};

const RENDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Graph source is invalid: {0}")]
    Invalid(String),
    #[error("Graph renderer did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("Graph renderer is not available")]
    Unavailable(#[from] io::Error),
}

/// Renders through the graphviz `dot` executable. The process is killed if
/// it outlives the timeout or the render future is dropped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Graphviz {
    pub program: PathBuf,
    pub format: String,
    pub timeout: Duration,
}

impl Default for Graphviz {
    fn default() -> Self {
        Self {
            program: PathBuf::from("dot"),
            format: "svg".to_string(),
            timeout: RENDER_TIMEOUT,
        }
    }
}

impl Graphviz {
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn render(&self, source: &str) -> Result<String, RenderError> {
        tracing::trace!("rendering {} bytes with {:?}", source.len(), self.program);

        match tokio::time::timeout(self.timeout, self.execute(source)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("{:?} timed out after {:?}", self.program, self.timeout);
                Err(RenderError::TimedOut(self.timeout))
            }
        }
    }

    async fn execute(&self, source: &str) -> Result<String, RenderError> {
        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", self.format))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // dot may start writing before it read large graphs completely, so
        // stdin is fed while the output is collected
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(source.as_bytes()).await?;
            }
            Ok::<(), io::Error>(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        if let Err(error) = fed {
            tracing::warn!("writing graph source to {:?} failed: {:?}", self.program, error);
        }

        let output = output?;
        if !output.status.success() {
            let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!("dot rejected graph source: {}", message);
            return Err(RenderError::Invalid(message));
        }

        let markup = String::from_utf8_lossy(&output.stdout).to_string();
        if markup.trim().is_empty() {
            return Err(RenderError::Invalid("dot returned no output".to_string()));
        }

        Ok(markup)
    }
}

/// Number of distinct red, yellow and green cells in a status graph.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AlertCounts {
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
}

// cells are identified by the id or tooltip following the colour, so a host
// carrying several services is counted once
const RED: &str = r#"bgcolor="red" (id="[^"]+"|tooltip="\S+)?"#;
const YELLOW: &str = r#"bgcolor="yellow" (id="[^"]+"|tooltip="\S+)?"#;
const GREEN: &str = r#"bgcolor="[a-z]*green" (id="[^"]+"|tooltip="\S+)?"#;

const BADGE_OVERFLOW: usize = 10;

impl AlertCounts {
    pub fn from_source(source: &str) -> Self {
        Self {
            red: count_unique(RED, source),
            yellow: count_unique(YELLOW, source),
            green: count_unique(GREEN, source),
        }
    }

    pub fn badge(&self) -> Badge {
        let color = if self.red > 0 {
            BadgeColor::Red
        } else if self.yellow > 0 {
            BadgeColor::Yellow
        } else if self.green > 0 {
            BadgeColor::LightGreen
        } else {
            BadgeColor::LightGrey
        };

        let count = if self.red > 0 { self.red } else { self.yellow };
        let text = if count > BADGE_OVERFLOW {
            "+".to_string()
        } else if count > 0 {
            count.to_string()
        } else {
            String::new()
        };

        Badge { color, text }
    }
}

fn count_unique(pattern: &str, source: &str) -> usize {
    let regex = Regex::new(pattern).expect("Failed to compile regex");
    regex
        .find_iter(source)
        .map(|m| m.as_str())
        .collect::<HashSet<_>>()
        .len()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BadgeColor {
    Red,
    Yellow,
    LightGreen,
    LightGrey,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Badge {
    pub color: BadgeColor,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_counts_unique_by_id() {
        let source = r##"
            <td bgcolor="red" id="web-prod-haproxy-0" tooltip="a">
            <td bgcolor="red" id="web-prod-haproxy-0" tooltip="a">
            <td bgcolor="red" id="web-prod-apache-1" tooltip="b">
            <td bgcolor="yellow" tooltip="unit: apache/1" href="#unit=apache/1">
            <td bgcolor="lightgreen" id="web-prod-mysql-0" tooltip="c">
        "##;

        let counts = AlertCounts::from_source(source);

        assert_eq!(2, counts.red);
        assert_eq!(1, counts.yellow);
        assert_eq!(1, counts.green);
    }

    #[test]
    fn alert_counts_empty_source() {
        assert_eq!(AlertCounts::default(), AlertCounts::from_source("digraph {}"));
    }

    #[test]
    fn badge_prefers_red_count() {
        let counts = AlertCounts {
            red: 3,
            yellow: 5,
            green: 1,
        };

        let badge = counts.badge();

        assert_eq!(BadgeColor::Red, badge.color);
        assert_eq!("3", badge.text);
    }

    #[test]
    fn badge_falls_back_to_yellow_count() {
        let counts = AlertCounts {
            red: 0,
            yellow: 2,
            green: 7,
        };

        let badge = counts.badge();

        assert_eq!(BadgeColor::Yellow, badge.color);
        assert_eq!("2", badge.text);
    }

    #[test]
    fn badge_green_has_no_text() {
        let counts = AlertCounts {
            red: 0,
            yellow: 0,
            green: 4,
        };

        let badge = counts.badge();

        assert_eq!(BadgeColor::LightGreen, badge.color);
        assert!(badge.text.is_empty());
    }

    #[test]
    fn badge_overflows_above_ten() {
        let ten = AlertCounts {
            red: 10,
            ..Default::default()
        };
        let eleven = AlertCounts {
            red: 11,
            ..Default::default()
        };

        assert_eq!("10", ten.badge().text);
        assert_eq!("+", eleven.badge().text);
    }

    #[test]
    fn badge_grey_without_cells() {
        assert_eq!(BadgeColor::LightGrey, AlertCounts::default().badge().color);
    }

    #[tokio::test]
    async fn graphviz_missing_program_is_unavailable() {
        let renderer = Graphviz::new(PathBuf::from("/nonexistent/dotty/dot"));

        let result = renderer.render("digraph { a -> b }").await;

        assert!(matches!(result, Err(RenderError::Unavailable(_))));
    }

    #[cfg(unix)]
    fn script(name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = std::env::temp_dir().join(format!("{}-{}", name, std::process::id()));
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn graphviz_returns_program_output() {
        let program = script("dotty-echo-dot", "cat");
        let renderer = Graphviz::new(program.clone());

        let result = renderer.render("digraph { a -> b }").await;

        std::fs::remove_file(&program).unwrap();
        assert_eq!("digraph { a -> b }", result.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn graphviz_failure_is_invalid() {
        let program = script("dotty-failing-dot", "echo 'syntax error in line 1' >&2; exit 1");
        let renderer = Graphviz::new(program.clone());

        let result = renderer.render("digraph {").await;

        std::fs::remove_file(&program).unwrap();
        match result {
            Err(RenderError::Invalid(message)) => assert_eq!("syntax error in line 1", message),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn graphviz_slow_program_times_out_without_blocking_runtime() {
        use std::sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        };

        let program = script("dotty-slow-dot", "sleep 5\ncat");
        let renderer = Graphviz::new(program.clone()).with_timeout(Duration::from_millis(300));

        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = tokio::spawn({
            let ticks = ticks.clone();
            async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        let started = std::time::Instant::now();
        let result = renderer.render("digraph { a }").await;
        let elapsed = started.elapsed();
        ticker.abort();

        std::fs::remove_file(&program).unwrap();
        assert!(matches!(result, Err(RenderError::TimedOut(_))));
        assert!(elapsed < Duration::from_secs(2));
        assert!(ticks.load(Ordering::SeqCst) > 0);
    }
}
