use regex::Regex;
use serde_json::Value;

/// Location in the status document addressed by a link fragment such as
/// `/service=mysql` or `/unit=mysql/0`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Fragment {
    AllServices,
    Service(String),
    Unit { service: String, unit: String },
}

impl Fragment {
    pub fn parse(fragment: &str) -> Option<Self> {
        let fragment = fragment.trim_start_matches('#');
        let fragment = fragment.strip_prefix('/').unwrap_or(fragment);

        let (kind, key) = fragment.rsplit_once('=')?;
        match kind {
            "service" if key == "__all__" => Some(Fragment::AllServices),
            "service" if !key.is_empty() => Some(Fragment::Service(key.to_owned())),
            "unit" => {
                let (service, number) = key.rsplit_once('/')?;
                if service.is_empty()
                    || number.is_empty()
                    || !number.chars().all(|c| c.is_ascii_digit())
                {
                    return None;
                }

                Some(Fragment::Unit {
                    service: service.to_owned(),
                    unit: key.to_owned(),
                })
            }
            _ => None,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Fragment::AllServices => "services".to_string(),
            Fragment::Service(name) => format!("service {}", name),
            Fragment::Unit { unit, .. } => format!("unit {}", unit),
        }
    }
}

/// Picks the subtree for `fragment`. Services are looked up under
/// `services` and, for newer documents, `applications`.
pub fn select<'a>(document: &'a Value, fragment: &Fragment) -> Option<&'a Value> {
    let services = document
        .get("services")
        .or_else(|| document.get("applications"))?;

    let selected = match fragment {
        Fragment::AllServices => Some(services),
        Fragment::Service(name) => services.get(name),
        Fragment::Unit { service, unit } => services.get(service)?.get("units")?.get(unit),
    };

    selected.filter(|value| !value.is_null())
}

/// Extracts status fragments linked from graph source, in order of first
/// appearance.
pub fn links(source: &str) -> Vec<String> {
    let regex = Regex::new(r#"#/?((?:service|unit)=[^"'\s>]+)"#).expect("Failed to compile regex");

    let mut links: Vec<String> = Vec::new();
    for captures in regex.captures_iter(source) {
        let link = format!("/{}", &captures[1]);
        if !links.contains(&link) {
            links.push(link);
        }
    }

    links
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AgentState {
    Error,
    Ok,
    Other,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SegmentKind {
    AgentState(AgentState),
    Key,
    MachineLink(String),
    Plain,
    String,
    Value,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

pub type StatusLine = Vec<Segment>;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StatusText {
    pub lines: Vec<StatusLine>,
}

impl StatusText {
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|s| s.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.lines.iter().flatten()
    }
}

/// Pretty prints `subtree` with three space indentation and classifies
/// agent states and machine numbers. Machine numbers only become links if
/// `document` carries a `machine-url`.
pub fn highlight(document: &Value, subtree: &Value) -> StatusText {
    let mut printer = Printer {
        line: Vec::new(),
        lines: Vec::new(),
        machine_url: document.get("machine-url").and_then(Value::as_str),
    };

    printer.value(subtree, 0, None, None);
    printer.newline();

    StatusText {
        lines: printer.lines,
    }
}

fn classify(state: &str, idle_is_ok: bool) -> AgentState {
    if state.ends_with("started") || (idle_is_ok && (state == "idle" || state == "executing")) {
        AgentState::Ok
    } else if state.ends_with("error") {
        AgentState::Error
    } else {
        AgentState::Other
    }
}

const INDENT: usize = 3;

struct Printer<'a> {
    line: StatusLine,
    lines: Vec<StatusLine>,
    machine_url: Option<&'a str>,
}

impl Printer<'_> {
    fn push(&mut self, kind: SegmentKind, text: impl Into<String>) {
        self.line.push(Segment {
            kind,
            text: text.into(),
        });
    }

    fn newline(&mut self) {
        let line = std::mem::take(&mut self.line);
        self.lines.push(line);
    }

    fn indent(&mut self, depth: usize) {
        if depth > 0 {
            self.push(SegmentKind::Plain, " ".repeat(depth * INDENT));
        }
    }

    fn value(&mut self, value: &Value, depth: usize, key: Option<&str>, parent: Option<&str>) {
        match value {
            Value::Object(map) if map.is_empty() => self.push(SegmentKind::Plain, "{}"),
            Value::Object(map) => {
                self.push(SegmentKind::Plain, "{");
                self.newline();

                for (index, (name, child)) in map.iter().enumerate() {
                    self.indent(depth + 1);
                    self.push(SegmentKind::Key, Value::from(name.as_str()).to_string());
                    self.push(SegmentKind::Plain, ": ");
                    self.value(child, depth + 1, Some(name.as_str()), key);

                    if index + 1 < map.len() {
                        self.push(SegmentKind::Plain, ",");
                    }
                    self.newline();
                }

                self.indent(depth);
                self.push(SegmentKind::Plain, "}");
            }
            Value::Array(items) if items.is_empty() => self.push(SegmentKind::Plain, "[]"),
            Value::Array(items) => {
                self.push(SegmentKind::Plain, "[");
                self.newline();

                for (index, child) in items.iter().enumerate() {
                    self.indent(depth + 1);
                    self.value(child, depth + 1, None, key);

                    if index + 1 < items.len() {
                        self.push(SegmentKind::Plain, ",");
                    }
                    self.newline();
                }

                self.indent(depth);
                self.push(SegmentKind::Plain, "]");
            }
            Value::String(text) => {
                let kind = self.classify_string(key, parent, text);
                self.push(kind, value.to_string());
            }
            Value::Number(number) => {
                let kind = self.classify_machine(key, &number.to_string(), SegmentKind::Value);
                self.push(kind, value.to_string());
            }
            Value::Bool(_) | Value::Null => self.push(SegmentKind::Value, value.to_string()),
        }
    }

    fn classify_string(&self, key: Option<&str>, parent: Option<&str>, text: &str) -> SegmentKind {
        match (key, parent) {
            (Some("agent-state"), _) => SegmentKind::AgentState(classify(text, false)),
            (Some("current"), Some("juju-status" | "agent-status")) => {
                SegmentKind::AgentState(classify(text, true))
            }
            _ => self.classify_machine(key, text, SegmentKind::String),
        }
    }

    fn classify_machine(&self, key: Option<&str>, machine: &str, other: SegmentKind) -> SegmentKind {
        let is_machine = key == Some("machine")
            && !machine.is_empty()
            && machine.chars().all(|c| c.is_ascii_digit());

        match self.machine_url {
            Some(url) if is_machine => SegmentKind::MachineLink(format!("{}{}", url, machine)),
            _ => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Value {
        serde_json::json!({
            "machine-url": "http://maas.local/nodes/",
            "services": {
                "mysql": {
                    "charm": "cs:mysql-1",
                    "units": {
                        "mysql/0": {
                            "agent-state": "started",
                            "machine": "3",
                            "open-ports": []
                        },
                        "mysql/1": {
                            "agent-state": "install-error",
                            "machine": "4"
                        }
                    }
                },
                "wordpress": {
                    "units": {
                        "wordpress/0": { "agent-state": "pending" }
                    }
                }
            }
        })
    }

    #[test]
    fn parse_fragments() {
        assert_eq!(Some(Fragment::AllServices), Fragment::parse("/service=__all__"));
        assert_eq!(
            Some(Fragment::Service("mysql".to_string())),
            Fragment::parse("/service=mysql")
        );
        assert_eq!(
            Some(Fragment::Unit {
                service: "mysql".to_string(),
                unit: "mysql/0".to_string()
            }),
            Fragment::parse("#unit=mysql/0")
        );
    }

    #[test]
    fn parse_rejects_unknown_shapes() {
        assert_eq!(None, Fragment::parse(""));
        assert_eq!(None, Fragment::parse("/machine=3"));
        assert_eq!(None, Fragment::parse("/unit=mysql"));
        assert_eq!(None, Fragment::parse("/unit=mysql/x"));
        assert_eq!(None, Fragment::parse("/service="));
    }

    #[test]
    fn select_unit() {
        let document = document();
        let fragment = Fragment::parse("/unit=mysql/0").unwrap();

        let unit = select(&document, &fragment).unwrap();

        assert_eq!(Some("started"), unit["agent-state"].as_str());
    }

    #[test]
    fn select_missing_is_none() {
        let document = document();

        assert!(select(&document, &Fragment::Service("redis".to_string())).is_none());
        assert!(select(
            &document,
            &Fragment::Unit {
                service: "mysql".to_string(),
                unit: "mysql/9".to_string()
            }
        )
        .is_none());
    }

    #[test]
    fn select_falls_back_to_applications() {
        let document = serde_json::json!({ "applications": { "redis": { "units": {} } } });

        let service = select(&document, &Fragment::Service("redis".to_string()));

        assert!(service.is_some());
    }

    #[test]
    fn highlight_all_services_pretty_prints() {
        let document = serde_json::json!({
            "services": {
                "mysql": {
                    "units": {},
                    "ports": [3306, "tcp"],
                    "exposed": true
                }
            }
        });
        let services = select(&document, &Fragment::AllServices).unwrap();

        let text = highlight(&document, services);

        let expected = [
            "{",
            "   \"mysql\": {",
            "      \"units\": {},",
            "      \"ports\": [",
            "         3306,",
            "         \"tcp\"",
            "      ],",
            "      \"exposed\": true",
            "   }",
            "}",
        ]
        .join("\n");

        assert_eq!(expected, text.text());
    }

    #[test]
    fn highlight_agent_states() {
        let document = document();
        let services = select(&document, &Fragment::AllServices).unwrap();

        let text = highlight(&document, services);

        let states: Vec<_> = text
            .segments()
            .filter_map(|segment| match segment.kind {
                SegmentKind::AgentState(state) => Some((state, segment.text.as_str())),
                _ => None,
            })
            .collect();

        assert_eq!(
            vec![
                (AgentState::Ok, "\"started\""),
                (AgentState::Error, "\"install-error\""),
                (AgentState::Other, "\"pending\""),
            ],
            states
        );
    }

    #[test]
    fn highlight_selected_unit_marks_started_ok() {
        let document = document();
        let fragment = Fragment::parse("/unit=mysql/0").unwrap();
        let unit = select(&document, &fragment).unwrap();

        let text = highlight(&document, unit);

        let started = text
            .segments()
            .find(|segment| segment.text == "\"started\"")
            .unwrap();

        assert_eq!(SegmentKind::AgentState(AgentState::Ok), started.kind);
        assert_eq!(None, Fragment::parse("/bogus"));
    }

    #[test]
    fn highlight_machine_links() {
        let document = document();
        let fragment = Fragment::parse("/unit=mysql/0").unwrap();
        let unit = select(&document, &fragment).unwrap();

        let text = highlight(&document, unit);

        let link = text
            .segments()
            .find_map(|segment| match &segment.kind {
                SegmentKind::MachineLink(url) => Some(url.as_str()),
                _ => None,
            });

        assert_eq!(Some("http://maas.local/nodes/3"), link);
    }

    #[test]
    fn highlight_machine_without_url_is_plain() {
        let document = serde_json::json!({
            "services": { "mysql": { "units": { "mysql/0": { "machine": "3" } } } }
        });
        let fragment = Fragment::parse("/unit=mysql/0").unwrap();
        let unit = select(&document, &fragment).unwrap();

        let text = highlight(&document, unit);

        assert!(!text
            .segments()
            .any(|segment| matches!(segment.kind, SegmentKind::MachineLink(_))));
    }

    #[test]
    fn highlight_current_state_counts_idle() {
        let document = serde_json::json!({});
        let unit = serde_json::json!({
            "juju-status": { "current": "idle" },
            "workload-status": { "current": "idle" }
        });

        let text = highlight(&document, &unit);

        let states: Vec<_> = text
            .segments()
            .filter(|segment| matches!(segment.kind, SegmentKind::AgentState(_)))
            .collect();

        assert_eq!(1, states.len());
        assert_eq!(SegmentKind::AgentState(AgentState::Ok), states[0].kind);
    }

    #[test]
    fn links_from_graph_source() {
        let source = r##"digraph {
            a [URL="#service=__all__"];
            b [href="#unit=mysql/0" tooltip="x"];
            c [href="#unit=mysql/0"];
            d [href="http://other"];
        }"##;

        assert_eq!(
            vec!["/service=__all__".to_string(), "/unit=mysql/0".to_string()],
            links(source)
        );
    }
}
