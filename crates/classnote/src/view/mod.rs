//! Plain-text views for the terminal front end.

mod dashboard_view;
mod session_view;

pub use {
    dashboard_view::render as render_dashboard,
    session_view::{SessionIntent, describe_error, dispatch, render as render_session},
};
