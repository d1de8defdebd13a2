#![forbid(unsafe_code)]

use crate::jsonrpc::parse_line;
use crate::server::DashServer;
use std::io::{BufRead, Write};

/// Answers newline-delimited JSON-RPC requests until the reader hits EOF.
/// Returns how many requests were handled; blank lines are skipped.
pub(crate) fn serve<R: BufRead, W: Write>(
    server: &mut DashServer,
    reader: R,
    mut writer: W,
) -> std::io::Result<u64> {
    let mut handled = 0;
    for line in reader.split(b'\n') {
        let line = line?;
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        handled += 1;

        let reply = match parse_line(line) {
            Ok(request) => server.handle(request),
            Err(reply) => Some(reply),
        };
        let Some(reply) = reply else {
            continue;
        };
        serde_json::to_writer(&mut writer, &reply)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(handled)
}
