//! Static file serving module
//!
//! Turns a resolved [`ServeTarget`] into a response: method check, stat,
//! freshness, then either the inline body or a streamed byte range of the file.

use futures_util::{future, stream, StreamExt, TryStreamExt};
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::{Method, Response};
use std::io::{self, SeekFrom};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::handler::router::RequestContext;
use crate::http::cache::{self, Validators};
use crate::http::mime::{self, MimeOverride};
use crate::http::range::{self, RangeOutcome};
use crate::http::response::{
    attach_validators, build_304_response, build_400_response, build_416_response,
    build_inline_response, build_range_response,
};
use crate::http::{self, ResponseBody};
use crate::logger;
use crate::routing::ServeTarget;

/// Read buffer size for streamed file bodies
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Size and modification time of a regular file
#[derive(Debug, Clone, Copy)]
struct ResourceStat {
    size: u64,
    modified: SystemTime,
}

impl ResourceStat {
    async fn of(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "not a regular file",
            ));
        }
        Ok(Self {
            size: metadata.len(),
            modified: metadata.modified()?,
        })
    }
}

/// Answer one request for `target`
///
/// Returns `None` when the target has no source, leaving the fallback to the
/// caller. Stat failures of any kind answer 404 before the range is looked at.
pub async fn respond(
    ctx: &RequestContext<'_>,
    target: &ServeTarget,
    overrides: &[MimeOverride],
) -> Option<Response<ResponseBody>> {
    if target.source.as_os_str().is_empty() {
        return None;
    }

    let content_type = mime::resolve(&target.logical_name, target.mime.as_deref(), overrides);

    match &ctx.method {
        &Method::GET => {}
        &Method::OPTIONS => return Some(http::build_options_response()),
        method => {
            logger::log_warning(&format!("Method not allowed: {method} {}", ctx.path));
            return Some(http::build_405_response());
        }
    }

    // A missing file is common (404), no need to log it
    let Ok(stat) = ResourceStat::of(&target.source).await else {
        return Some(http::build_404_response());
    };
    let validators = Validators::new(stat.size, stat.modified);

    let mut response = if cache::is_fresh(&ctx.conditional(), &validators) {
        build_304_response()
    } else if let Some(inline) = &target.inline {
        build_inline_response(inline.clone(), content_type.as_deref())
    } else {
        match serve_file(
            &target.source,
            stat.size,
            ctx.range_header,
            content_type.as_deref(),
        )
        .await
        {
            Some(response) => response,
            None => return Some(http::build_404_response()),
        }
    };

    attach_validators(&mut response, &validators);
    Some(response)
}

/// Resolve the range and stream the selected bytes
///
/// Returns `None` when the file cannot be opened or positioned.
async fn serve_file(
    source: &Path,
    size: u64,
    range_header: Option<&str>,
    content_type: Option<&str>,
) -> Option<Response<ResponseBody>> {
    let outcome = range::resolve(range_header, Some(size));
    let headers = outcome.headers(Some(size));

    let (start, len) = match outcome {
        RangeOutcome::Rejected(reason) => return Some(build_400_response(reason)),
        RangeOutcome::Unsatisfiable => return Some(build_416_response(&headers)),
        RangeOutcome::Full => (0, size),
        RangeOutcome::Partial { start, end } => (start, end - start + 1),
    };

    match open_stream(source, start, len).await {
        Ok(body) => Some(build_range_response(&headers, content_type, body)),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to open file '{}': {e}",
                source.display()
            ));
            None
        }
    }
}

/// Open `path` and stream `len` bytes starting at `start`
///
/// The file handle is owned by the body and closed when the body is dropped.
/// A file that shrank after the stat ends the body with an `UnexpectedEof`
/// error, so the connection is aborted instead of sending a short body.
async fn open_stream(path: &Path, start: u64, len: u64) -> io::Result<ResponseBody> {
    let mut file = File::open(path).await?;
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }

    let sent = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&sent);
    let source = path.display().to_string();

    let chunks = ReaderStream::with_capacity(file.take(len), STREAM_CHUNK_SIZE).inspect_ok(
        move |chunk| {
            let read = u64::try_from(chunk.len()).unwrap_or(u64::MAX);
            counter.fetch_add(read, Ordering::Relaxed);
        },
    );
    let short_read = stream::once(async move {
        let read = sent.load(Ordering::Relaxed);
        (read < len).then(|| {
            logger::log_error(&format!(
                "Short read on '{source}': {read} of {len} bytes, file changed while streaming"
            ));
            Err::<bytes::Bytes, _>(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file shrank while streaming",
            ))
        })
    })
    .filter_map(future::ready);

    let stream = chunks.chain(short_read).map_ok(Frame::data);
    Ok(BodyExt::boxed(StreamBody::new(stream)))
}
