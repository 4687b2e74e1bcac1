//! The external conversion collaborator

use anyhow::{bail, Context};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use super::config::ConverterOptions;

/// Turns one source file into converted bytes.
///
/// The converter receives the source file's path, never its contents, and is
/// treated as opaque by the tree converter.
pub trait Converter: Sync {
    fn convert(&self, source: &Path, options: &ConverterOptions) -> anyhow::Result<Vec<u8>>;
}

impl<F> Converter for F
where
    F: Fn(&Path, &ConverterOptions) -> anyhow::Result<Vec<u8>> + Sync,
{
    fn convert(&self, source: &Path, options: &ConverterOptions) -> anyhow::Result<Vec<u8>> {
        self(source, options)
    }
}

pub const ENV_PRETTY: &str = "TPLCONV_PRETTY";
pub const ENV_INDENT: &str = "TPLCONV_INDENT";
pub const ENV_LEFT_DELIM: &str = "TPLCONV_LEFT_DELIM";
pub const ENV_RIGHT_DELIM: &str = "TPLCONV_RIGHT_DELIM";

/// Runs an external program as `program args... <source>` and takes its
/// stdout as the converted output.
///
/// Converter options are exported to the child as `TPLCONV_*` environment
/// variables; options that are unset are not exported.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandConverter {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    fn command(&self, source: &Path, options: &ConverterOptions) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env(ENV_PRETTY, if options.pretty { "1" } else { "0" });

        if let Some(indent) = &options.indent {
            command.env(ENV_INDENT, indent);
        }
        if let Some(left) = &options.left_delim {
            command.env(ENV_LEFT_DELIM, left);
        }
        if let Some(right) = &options.right_delim {
            command.env(ENV_RIGHT_DELIM, right);
        }

        command
    }
}

impl Converter for CommandConverter {
    fn convert(&self, source: &Path, options: &ConverterOptions) -> anyhow::Result<Vec<u8>> {
        let output = self
            .command(source, options)
            .output()
            .with_context(|| format!("failed to run converter {:?}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                bail!("converter {:?} exited with {}", self.program, output.status);
            }
            bail!(
                "converter {:?} exited with {}: {}",
                self.program,
                output.status,
                stderr
            );
        }

        Ok(output.stdout)
    }
}
