#[cfg(target_arch = "wasm32")]
fn main() {
    use leptos::*;
    use turntable::ui::App;
    use turntable::ViewerConfig;

    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let query = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    let config = ViewerConfig::from_query(&query);
    logging::log!("starting viewer with {config:?}");
    mount_to_body(move || view! { <App config /> });
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("turntable runs in the browser; build it for wasm32-unknown-unknown");
}
