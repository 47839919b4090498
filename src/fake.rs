use std::cell::RefCell;
use std::rc::Rc;

use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::tito::{DiscountCodeApi, DiscountCodeRequest};

/// Records every code it is asked to create; `respond` picks the status,
/// `None` simulates a transport failure. Clones share the same record.
#[derive(Clone)]
pub struct FakeApi {
    respond: fn(&str) -> Option<u16>,
    seen: Rc<RefCell<Vec<DiscountCodeRequest>>>,
}

impl FakeApi {
    pub fn new(respond: fn(&str) -> Option<u16>) -> Self {
        Self {
            respond,
            seen: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<DiscountCodeRequest> {
        self.seen.borrow().clone()
    }

    pub fn codes(&self) -> Vec<String> {
        self.seen.borrow().iter().map(|r| r.code.clone()).collect()
    }
}

impl DiscountCodeApi for FakeApi {
    async fn create_discount_code(&self, request: &DiscountCodeRequest) -> Result<StatusCode> {
        self.seen.borrow_mut().push(request.clone());
        match (self.respond)(&request.code) {
            Some(status) => Ok(StatusCode::from_u16(status).unwrap()),
            None => Err(Error::Transport(Box::new(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "timed out",
            )))),
        }
    }
}
