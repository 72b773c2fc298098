pub mod bar;
pub mod outcome;
pub mod side;
pub mod trade_event;
pub mod trade_request;
