//! Test harness for running fixtures with stochastic variations

use crate::common::{Gen, TestCase};
use strparse_core::address::AddressParser;
use strparse_core::json::{EventRecorder, JsonListener, JsonParser, JsonSerializer};
use strparse_core::query::{QueryParser, QueryTrace};
use strparse_core::{CharStream, StrSource, StreamOptions};

use std::ops::ControlFlow;

/// Which parser a fixture file exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Json,
    Query,
    Address,
}

/// Compact JSON event trace.
///
/// `{`/`}` objects, `<name>`…`</name>` properties, `[`/`]` arrays,
/// `(`…`)` elements, `,` between siblings, values verbatim and `~` for null.
#[derive(Debug, Default)]
pub struct TraceListener {
    pub out: String,
    counts: Vec<usize>,
}

impl TraceListener {
    fn separate(&mut self) {
        if let Some(count) = self.counts.last_mut() {
            *count += 1;
            if *count > 1 {
                self.out.push(',');
            }
        }
    }
}

impl JsonListener for TraceListener {
    fn begin_object(&mut self) {
        self.out.push('{');
        self.counts.push(0);
    }
    fn end_object(&mut self) {
        self.out.push('}');
        self.counts.pop();
    }
    fn begin_property(&mut self, name: &str) {
        self.separate();
        self.out.push_str(&format!("<{name}>"));
    }
    fn end_property(&mut self, name: &str) {
        self.out.push_str(&format!("</{name}>"));
    }
    fn begin_array(&mut self) {
        self.out.push('[');
        self.counts.push(0);
    }
    fn end_array(&mut self) {
        self.out.push(']');
        self.counts.pop();
    }
    fn begin_element(&mut self) {
        self.separate();
        self.out.push('(');
    }
    fn end_element(&mut self) {
        self.out.push(')');
    }
    fn on_value(&mut self, value: Option<&str>) {
        self.out.push_str(value.unwrap_or("~"));
    }
}

/// Trace of a JSON input parsed with default options
pub fn json_trace(input: &str) -> String {
    let mut trace = TraceListener::default();
    strparse_core::json::parse_str(input, &mut trace);
    trace.out
}

/// Everything observed from one parse, as labelled lines
fn observe(kind: Kind, input: &str, options: StreamOptions) -> Vec<String> {
    let mut stream = CharStream::with_options(StrSource::new(input), options);
    let mut lines = match kind {
        Kind::Json => {
            let mut events = EventRecorder::new();
            JsonParser::new(&mut stream).parse(&mut events);
            let mut trace = TraceListener::default();
            let mut canonical = JsonSerializer::new();
            events.replay(&mut trace);
            events.replay(&mut canonical);
            vec![format!("trace {}", trace.out), format!("canonical {}", canonical.as_str())]
        }
        Kind::Query => {
            let mut trace = QueryTrace::new();
            QueryParser::new(&mut stream).parse(&mut trace);
            vec![format!("trace {}", trace.as_str())]
        }
        Kind::Address => {
            let mut lines = Vec::new();
            let _ = AddressParser::new(&mut stream).parse(&mut |email: &str, name: &str| -> ControlFlow<()> {
                lines.push(format!("address [{name}][{email}]"));
                ControlFlow::Continue(())
            });
            lines
        }
    };
    if stream.open_markers() != 0 {
        lines.push(format!("error {} markers left open", stream.open_markers()));
    }
    lines
}

/// Expected lines for a case, in the same shape as `observe`
fn expectations(kind: Kind, case: &TestCase) -> Vec<(usize, String)> {
    let mut expected = Vec::new();
    match kind {
        Kind::Json => {
            if let Some(trace) = &case.trace {
                expected.push((0, format!("trace {trace}")));
            }
            if let Some(canonical) = &case.canonical {
                expected.push((1, format!("canonical {canonical}")));
            }
        }
        Kind::Query => {
            if let Some(trace) = &case.trace {
                expected.push((0, format!("trace {trace}")));
            }
        }
        Kind::Address => {
            for (i, (name, email)) in case.addresses.iter().flatten().enumerate() {
                expected.push((i, format!("address [{name}][{email}]")));
            }
        }
    }
    expected
}

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub capacity: usize,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

fn check(kind: Kind, case: &TestCase, input: String, options: StreamOptions, seed: u64) -> TestResult {
    let actual = observe(kind, &input, options);
    let expected = expectations(kind, case);
    let mut errors = Vec::new();

    if expected.is_empty() {
        errors.push("Fixture has no expectations".to_string());
    }
    if kind == Kind::Address && actual.len() != expected.len() {
        errors.push(format!("Address count mismatch: expected {}, got {}", expected.len(), actual.len()));
    }
    for (i, exp) in &expected {
        match actual.get(*i) {
            Some(act) if act == exp => {}
            Some(act) => errors.push(format!("Line {}: expected '{}', got '{}'", i, exp, act)),
            None => errors.push(format!("Line {}: expected '{}', got nothing", i, exp)),
        }
    }
    for act in &actual {
        if act.starts_with("error") {
            errors.push(act.clone());
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input,
        capacity: options.initial_capacity,
        expected: expected.into_iter().map(|(_, e)| e).collect(),
        actual,
        seed,
        errors,
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(kind: Kind, case: &TestCase) -> TestResult {
    check(kind, case, case.input.clone(), StreamOptions::default(), 0)
}

/// Run test with stochastic variations
///
/// Applies independent variations, none of which may change the outcome:
/// - Random leading whitespace
/// - 50% chance of leading garbage before a JSON object
/// - Tiny ring buffer capacity, so every lookahead forces growth
pub fn run_with_variations(kind: Kind, case: &TestCase, gen: &mut Gen) -> TestResult {
    let mut input = String::new();
    if kind == Kind::Json && gen.chance(0.5) {
        input.push_str(&gen.garbage());
    }
    input.push_str(&gen.whitespace());
    input.push_str(&case.input);

    let options = StreamOptions::default().initial_capacity(gen.capacity());
    check(kind, case, input, options, gen.seed)
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set STRPARSE_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("Initial capacity: {}", self.capacity);
        eprintln!("\nInput:");
        eprintln!("{:?}", self.input);
        eprintln!("\nExpected:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
