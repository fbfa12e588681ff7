use crate::readiness::domain::{TestCaseOutcome, TestCaseStatus, TestSummary};
use crate::shared::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Elements the parser cares about; everything else is `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    TestSuites,
    TestSuite,
    TestCase,
    Failure,
    Error,
    Skipped,
    Other,
}

impl Element {
    fn of(e: &BytesStart) -> Self {
        match e.local_name().as_ref() {
            b"testsuites" => Element::TestSuites,
            b"testsuite" => Element::TestSuite,
            b"testcase" => Element::TestCase,
            b"failure" => Element::Failure,
            b"error" => Element::Error,
            b"skipped" => Element::Skipped,
            _ => Element::Other,
        }
    }
}

#[derive(Debug, Default)]
struct Detail {
    message: String,
    text: String,
}

/// A test case being read; the outcome is resolved when it closes
#[derive(Debug, Default)]
struct CaseBuilder {
    name: String,
    classname: String,
    duration_sec: f64,
    failure: Option<Detail>,
    error: Option<Detail>,
    skipped: bool,
}

impl CaseBuilder {
    fn new(e: &BytesStart) -> Self {
        Self {
            name: attribute(e, b"name").unwrap_or_default(),
            classname: attribute(e, b"classname").unwrap_or_default(),
            duration_sec: seconds(e),
            ..Self::default()
        }
    }

    /// failure takes precedence over error, error over skipped
    fn finish(self) -> TestCaseOutcome {
        let (status, detail) = if let Some(detail) = self.failure {
            (TestCaseStatus::Failed, Some(detail))
        } else if let Some(detail) = self.error {
            (TestCaseStatus::Error, Some(detail))
        } else if self.skipped {
            (TestCaseStatus::Skipped, None)
        } else {
            (TestCaseStatus::Passed, None)
        };

        let (failure_message, failure_text) = match detail {
            Some(d) => (non_empty(d.message), non_empty(d.text)),
            None => (None, None),
        };

        TestCaseOutcome {
            name: self.name,
            classname: self.classname,
            duration_sec: self.duration_sec,
            status,
            failure_message,
            failure_text,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn seconds(e: &BytesStart) -> f64 {
    attribute(e, b"time")
        .and_then(|t| t.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[derive(Debug, Default)]
struct ParseState {
    summary: TestSummary,
    root: Option<Element>,
    stack: Vec<Element>,
    suites: usize,
    case: Option<CaseBuilder>,
}

impl ParseState {
    /// Only top-level suites count: the root `<testsuite>` or direct
    /// children of a `<testsuites>` root.
    fn at_suite_level(&self) -> bool {
        matches!(self.stack.as_slice(), [] | [Element::TestSuites])
    }

    fn in_counted_suite(&self) -> bool {
        matches!(
            self.stack.as_slice(),
            [Element::TestSuite] | [Element::TestSuites, Element::TestSuite]
        )
    }

    fn open(&mut self, e: &BytesStart) -> Result<()> {
        let element = Element::of(e);

        if self.stack.is_empty() && self.root.is_none() {
            if !matches!(element, Element::TestSuites | Element::TestSuite) {
                anyhow::bail!(
                    "Unrecognized JUnit XML root element <{}>",
                    String::from_utf8_lossy(e.local_name().as_ref())
                );
            }
            self.root = Some(element);
        }

        match element {
            Element::TestSuite if self.at_suite_level() => {
                self.suites += 1;
                self.summary.duration_sec += seconds(e);
            }
            Element::TestCase if self.in_counted_suite() => {
                self.case = Some(CaseBuilder::new(e));
            }
            Element::Failure | Element::Error | Element::Skipped
                if self.stack.last() == Some(&Element::TestCase) =>
            {
                if let Some(case) = self.case.as_mut() {
                    let detail = || Detail {
                        message: attribute(e, b"message").unwrap_or_default(),
                        text: String::new(),
                    };
                    match element {
                        Element::Failure => case.failure = Some(detail()),
                        Element::Error => case.error = Some(detail()),
                        _ => case.skipped = true,
                    }
                }
            }
            _ => {}
        }

        self.stack.push(element);
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let Some(case) = self.case.as_mut() else {
            return;
        };
        let target = match self.stack.last() {
            Some(Element::Failure) => case.failure.as_mut(),
            Some(Element::Error) => case.error.as_mut(),
            _ => None,
        };
        if let Some(detail) = target {
            detail.text.push_str(text);
        }
    }

    fn close(&mut self) {
        if self.stack.pop() == Some(Element::TestCase) {
            if let Some(case) = self.case.take() {
                self.summary.record(case.finish());
            }
        }
    }

    fn finish(self) -> Result<TestSummary> {
        match self.root {
            None => anyhow::bail!("Unrecognized JUnit XML format: no root element"),
            Some(Element::TestSuites) if self.suites == 0 => {
                anyhow::bail!("Unrecognized JUnit XML format: <testsuites> without <testsuite>")
            }
            _ => Ok(self.summary),
        }
    }
}

/// JunitParser turns JUnit XML result files into test summaries
///
/// Accepts a `<testsuites>` root holding at least one `<testsuite>`, or a
/// bare `<testsuite>` root. Each `<testcase>` counts as failed when it has a
/// `<failure>` child, as failed (status `error`) when it has an `<error>`
/// child, as skipped when it has a `<skipped>` child, and as passed
/// otherwise. Duration is the sum of the suites' `time` attributes.
pub struct JunitParser;

impl JunitParser {
    /// Parses one result document
    ///
    /// # Errors
    /// Returns an error if the document is not well-formed XML or does not
    /// have a JUnit root element
    pub fn parse(data: &[u8]) -> Result<TestSummary> {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(true);

        let mut state = ParseState::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => state.open(&e)?,
                Ok(Event::Empty(e)) => {
                    state.open(&e)?;
                    state.close();
                }
                Ok(Event::End(_)) => state.close(),
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                    state.text(&text);
                }
                Ok(Event::CData(t)) => {
                    state.text(&String::from_utf8_lossy(&t.into_inner()));
                }
                Ok(Event::Eof) => break,
                Err(e) => anyhow::bail!(
                    "Malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                ),
                _ => {}
            }
            buf.clear();
        }

        state.finish()
    }

    /// Parses several documents and merges them into one summary
    ///
    /// # Errors
    /// Returns the first parse error
    pub fn parse_all<'a, I>(documents: I) -> Result<TestSummary>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let summaries = documents
            .into_iter()
            .map(Self::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(TestSummary::merge_all(summaries))
    }
}
