//! External interpreter commands
//!
//! A [`CommandInterpreter`] runs a user-supplied program, writes an
//! [`InterpretRequest`] as JSON to its stdin, and reads an
//! [`Interpretation`] as JSON from its stdout.

use std::{
    io::{self, Write as _},
    process::{Command, Stdio},
    thread,
};

use anyhow::bail;
use serde::Serialize;
use tabstat_analysis::StatisticalResults;
use tabstat_report::{InterpretError, Interpretation, Interpreter};

#[derive(Debug, Serialize)]
struct InterpretRequest<'a> {
    results: &'a StatisticalResults,
    question: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub(crate) struct CommandInterpreter {
    program: String,
    args: Vec<String>,
}

impl CommandInterpreter {
    /// Splits a command line on whitespace into program and arguments.
    pub(crate) fn parse(command_line: &str) -> anyhow::Result<Self> {
        let mut words = command_line.split_whitespace().map(str::to_owned);
        let Some(program) = words.next() else {
            bail!("Interpreter command is empty");
        };
        Ok(Self {
            program,
            args: words.collect(),
        })
    }
}

impl Interpreter for CommandInterpreter {
    fn interpret(
        &self,
        results: &StatisticalResults,
        question: Option<&str>,
    ) -> Result<Interpretation, InterpretError> {
        let payload = serde_json::to_vec(&InterpretRequest { results, question })
            .map_err(io::Error::from)?;

        tracing::debug!(program = %self.program, bytes = payload.len(), "running interpreter command");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let mut stdin = child.stdin.take().ok_or_else(|| InterpretError::Command {
            message: "stdin of the interpreter was not captured".to_owned(),
        })?;

        // stdin must be written while stdout is drained
        let (written, output) = thread::scope(|s| {
            let writer = s.spawn(move || stdin.write_all(&payload));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InterpretError::Command {
                message: format!("`{}` exited with {}: {}", self.program, output.status, stderr.trim()),
            });
        }
        // The child may legitimately exit without consuming its input.
        match written {
            Err(err) if err.kind() != io::ErrorKind::BrokenPipe => return Err(err.into()),
            _ => {}
        }

        serde_json::from_slice(&output.stdout).map_err(|err| InterpretError::Parse {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tabstat_analysis::{analyze, table::RawCell};
    use tabstat_report::interpretation::{TemplateInterpreter, interpret_or_fallback};

    use super::*;

    fn sample_results() -> StatisticalResults {
        let rows = (0..15)
            .map(|i| {
                vec![
                    RawCell::from(f64::from(i)),
                    RawCell::from(f64::from(i % 4)),
                ]
            })
            .collect();
        analyze(vec!["t".into(), "cycle".into()], rows).unwrap()
    }

    fn canned() -> Interpretation {
        Interpretation {
            executive_summary: "Summary from the command.".into(),
            key_findings: vec!["t increases steadily.".into()],
            statistical_significance: "None.".into(),
            practical_implications: "None.".into(),
            limitations: "Small sample.".into(),
            recommendations: vec![],
            methodology: "Canned.".into(),
        }
    }

    #[cfg(unix)]
    fn shell(script: String) -> CommandInterpreter {
        CommandInterpreter {
            program: "sh".into(),
            args: vec!["-c".into(), script],
        }
    }

    #[test]
    fn test_parse_command_line() {
        let interpreter = CommandInterpreter::parse("  python3 interp.py --model small ").unwrap();
        assert_eq!(interpreter.program, "python3");
        assert_eq!(interpreter.args, ["interp.py", "--model", "small"]);
        assert!(CommandInterpreter::parse("   ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_success() {
        let json = serde_json::to_string(&canned()).unwrap();
        let interpreter = shell(format!(
            "grep -q '\"question\":\"why?\"' && printf '%s' '{json}'"
        ));
        let interpretation = interpreter
            .interpret(&sample_results(), Some("why?"))
            .unwrap();
        assert_eq!(interpretation, canned());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_failure() {
        let interpreter = shell("echo 'model unavailable' >&2; exit 3".into());
        let err = interpreter.interpret(&sample_results(), None).unwrap_err();
        match err {
            InterpretError::Command { message } => {
                assert!(message.contains("model unavailable"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_invalid_output() {
        let interpreter = shell("cat".into());
        let err = interpreter.interpret(&sample_results(), None).unwrap_err();
        assert!(matches!(err, InterpretError::Parse { .. }), "{err}");
    }

    #[test]
    fn test_missing_program_falls_back() {
        let interpreter = CommandInterpreter::parse("tabstat-no-such-interpreter-binary").unwrap();
        let results = sample_results();
        let err = interpreter.interpret(&results, None).unwrap_err();
        assert!(matches!(err, InterpretError::Io(_)), "{err}");

        let interpretation = interpret_or_fallback(&interpreter, &results, Some("trend?"));
        assert_eq!(
            interpretation,
            TemplateInterpreter::build(&results, Some("trend?"))
        );
    }
}
