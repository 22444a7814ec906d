//! Pages of the marketing site.

mod home;
mod sign_in;

use facade_static::{Page, RouteError, RouteTable};

/// Route table for the whole site.
pub fn routes() -> Result<RouteTable, RouteError> {
    let mut routes = RouteTable::new();

    routes.register(
        "/",
        Page::new("Home", home::layout)
            .with_description("Launch your next idea with a ready-made marketing site."),
    )?;
    routes.register("/sign-in-form", Page::new("Login", sign_in::layout))?;

    Ok(routes)
}
