//! The `age-plugin-qage` binary.
//!
//! A thin shell around [`qage::plugin::run`]: locked stdio in, exit code
//! out. The parent age client owns any timeout policy, so blocking reads
//! are fine here.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    let code = qage::plugin::run(stdin.lock(), stdout.lock(), stderr.lock());
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
