//! Connection driver: one request, one response, then close
//!
//! Works on any duplex byte stream, so the listener hands over accepted
//! TCP streams and tests use in-memory pipes.

use crate::config::Limits;
use crate::parser;
use crate::service::{error_response, Service};
use crate::{Error, Request, Result};
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Bytes requested from the stream per read
const READ_CHUNK: usize = 4096;

/// Read one complete request: head up to the blank line, then exactly
/// `Content-Length` body bytes
pub async fn read_request<S>(stream: &mut S, limits: &Limits) -> Result<Request>
where
    S: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(READ_CHUNK);

    let head_end = loop {
        if let Some(end) = parser::find_head_end(&buf) {
            break end;
        }
        if buf.len() >= limits.max_head_bytes {
            return Err(Error::HeadTooLarge {
                limit: limits.max_head_bytes,
            });
        }

        buf.reserve(READ_CHUNK);
        if stream.read_buf(&mut buf).await? == 0 {
            return Err(if buf.is_empty() {
                Error::ConnectionClosed
            } else {
                Error::Parse("connection closed inside request head".to_string())
            });
        }
    };

    if head_end > limits.max_head_bytes {
        return Err(Error::HeadTooLarge {
            limit: limits.max_head_bytes,
        });
    }

    let head = parser::parse_head(&buf[..head_end])?;
    let expected = parser::content_length(&head.headers)?;
    if expected > limits.max_body_bytes {
        return Err(Error::BodyTooLarge {
            size: expected,
            limit: limits.max_body_bytes,
        });
    }

    let mut body = buf.split_off(head_end);
    while body.len() < expected {
        body.reserve((expected - body.len()).min(READ_CHUNK));
        if stream.read_buf(&mut body).await? == 0 {
            return Err(Error::IncompleteBody {
                expected,
                received: body.len(),
            });
        }
    }
    body.truncate(expected);

    Ok(Request::from_head(head, body.freeze()))
}

/// Serve a single request on `stream` and close it
///
/// Client and handler errors are answered with a status-only response.
/// Errors returned from here mean the stream itself failed, timed out or
/// was closed early; there is nobody left to answer.
pub async fn serve_connection<S>(mut stream: S, service: &Service, limits: &Limits) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let read = tokio::time::timeout(limits.read_timeout, read_request(&mut stream, limits)).await;

    let response = match read {
        Ok(Ok(req)) => {
            let res = service.respond(&req).await;
            tracing::info!(
                method = %req.method(),
                path = req.path(),
                status = res.status.as_u16(),
                bytes = res.body.len(),
                "request"
            );
            res
        }
        Ok(Err(err @ (Error::Io(_) | Error::ConnectionClosed))) => return Err(err),
        Ok(Err(err)) => error_response(&err),
        Err(_) => return Err(Error::Timeout),
    };

    stream.write_all(&response.to_http1_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}
