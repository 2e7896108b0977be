use std::io;
use std::sync::Arc;

use may_minihttp::{HttpService, Request, Response};

use super::request::parse_request;
use super::response::{status_reason, write_response};
use crate::config::AppConfig;
use crate::dispatcher::{Dispatcher, HandlerResponse};
use crate::static_files::StaticFiles;

/// The per-connection HTTP service: parse, short-circuit static assets,
/// dispatch, write.
///
/// Everything shared lives behind `Arc` and is read-only once the
/// application is built, so connection coroutines clone this freely.
#[derive(Clone)]
pub struct AppService {
    pub dispatcher: Arc<Dispatcher>,
    pub config: Arc<AppConfig>,
    pub assets: StaticFiles,
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = match parse_request(req, self.config.max_body_bytes) {
            Ok(parsed) => parsed,
            Err(err) => {
                write_response(res, HandlerResponse::text(err.status(), err.to_string()));
                return Ok(());
            }
        };

        // The asset prefix wins before any pattern is consulted.
        if parsed.path.starts_with(&self.config.assets_prefix) {
            match self.assets.load(&parsed.path) {
                Ok((bytes, content_type)) => {
                    res.status_code(200, status_reason(200));
                    res.header(Box::leak(
                        format!("Content-Type: {content_type}").into_boxed_str(),
                    ));
                    res.body_vec(bytes);
                }
                Err(_) => write_response(res, HandlerResponse::not_found(&parsed.path)),
            }
            return Ok(());
        }

        let response = self.dispatcher.dispatch(&parsed);
        write_response(res, response);
        Ok(())
    }
}
