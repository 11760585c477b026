//! Snow-dome demo stub.

use web_sys as web;

pub fn run(app: &web::Element) -> anyhow::Result<()> {
    app.set_inner_html("<p>Snow Dome demo - coming soon</p>");
    Ok(())
}
