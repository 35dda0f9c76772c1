use std::ffi::c_void;
use std::fmt;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::sync::OnceLock;

/// Maximum number of program addresses recorded per capture.
pub const MAX_STACK_DEPTH: usize = 50;

const UNKNOWN_SOURCE: &str = "???";

const CAPTURE_FUNCTION: &str = concat!(module_path!(), "::Stack::capture");

/// Call stack recorded when an error is constructed.
///
/// Only raw program addresses are stored at capture time. Symbolization is
/// deferred until [`Stack::frames`] is first called and the result is kept
/// for every later call.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    callers: Vec<usize>,
    frames: OnceLock<Vec<StackFrame>>,
}

impl Stack {
    /// Record the current call stack, innermost frame first.
    #[inline(never)]
    pub fn capture() -> Self {
        let mut callers = Vec::with_capacity(MAX_STACK_DEPTH);
        backtrace::trace(|frame| {
            callers.push(frame.ip() as usize);
            callers.len() < MAX_STACK_DEPTH
        });

        Self::from_callers(callers)
    }

    /// Build a stack from already known program addresses.
    pub fn from_callers(callers: Vec<usize>) -> Self {
        Self {
            callers,
            frames: OnceLock::new(),
        }
    }

    /// Raw program addresses as captured, capture machinery included.
    pub fn callers(&self) -> &[usize] {
        &self.callers
    }

    pub fn is_empty(&self) -> bool {
        self.callers.is_empty()
    }

    /// Symbolized frames, starting at the function that constructed the error.
    pub fn frames(&self) -> &[StackFrame] {
        self.frames.get_or_init(|| {
            let mut frames: Vec<StackFrame> =
                self.callers.iter().map(|&pc| StackFrame::new(pc)).collect();
            let skipped = capture_prefix_len(&frames);
            frames.drain(..skipped);
            frames
        })
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.frames() {
            write!(f, "{}", frame)?;
        }
        Ok(())
    }
}

/// Number of leading frames that belong to the unwinder, [`Stack::capture`]
/// or the error constructors.
fn capture_prefix_len(frames: &[StackFrame]) -> usize {
    frames
        .iter()
        .rposition(StackFrame::is_capture_frame)
        .map_or(0, |index| index + 1)
}

/// One symbolized call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackFrame {
    pub file: String,
    pub line_number: u32,
    pub name: String,
    pub package: String,
    pub program_counter: usize,
}

impl StackFrame {
    /// Resolve a return address into file, line and function.
    ///
    /// Unresolvable addresses (including zero) leave every field but the
    /// program counter empty.
    pub fn new(program_counter: usize) -> Self {
        let mut frame = StackFrame {
            program_counter,
            ..Default::default()
        };
        if program_counter == 0 {
            return frame;
        }

        // Return addresses point past the call instruction.
        let address = (program_counter - 1) as *mut c_void;
        let mut resolved = false;
        backtrace::resolve(address, |symbol| {
            if resolved {
                return;
            }
            resolved = true;

            if let Some(name) = symbol.name() {
                let (package, name) = package_and_name(&format!("{:#}", name));
                frame.package = package;
                frame.name = name;
            }
            if let Some(file) = symbol.filename() {
                frame.file = file.display().to_string();
            }
            frame.line_number = symbol.lineno().unwrap_or(0);
        });

        frame
    }

    /// Fully qualified function path.
    pub fn function(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.package, self.name)
        }
    }

    /// Text of the source line, when the file is readable from here.
    pub fn source_line(&self) -> Option<String> {
        if self.line_number == 0 {
            return None;
        }

        let file = File::open(&self.file).ok()?;
        BufReader::new(file)
            .lines()
            .nth(self.line_number as usize - 1)?
            .ok()
            .map(|line| line.trim().to_string())
    }

    fn is_capture_frame(&self) -> bool {
        let function = self.function();
        function.starts_with("backtrace::")
            || function.starts_with(CAPTURE_FUNCTION)
            || function.starts_with(super::CONSTRUCTOR_PATH)
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self
            .source_line()
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

        writeln!(
            f,
            "{}:{} (0x{:x})",
            self.file, self.line_number, self.program_counter
        )?;
        writeln!(f, "\t{}: {}", self.name, source)
    }
}

/// Split a demangled symbol into its module path and function name.
///
/// Separators nested inside `<...>` (trait impls, generic arguments) do not
/// count.
fn package_and_name(symbol: &str) -> (String, String) {
    let mut depth = 0usize;
    let mut split = None;
    let bytes = symbol.as_bytes();

    for (index, byte) in bytes.iter().enumerate() {
        match byte {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(index + 1) == Some(&b':') => split = Some(index),
            _ => {}
        }
    }

    match split {
        Some(index) if index > 0 => (
            symbol[..index].to_string(),
            symbol[index + 2..].to_string(),
        ),
        _ => (String::new(), symbol.to_string()),
    }
}
