use std::cell::RefCell;
use std::rc::Rc;

use leptos::logging::{error, log};
use leptos::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::{FullscreenStrategy, ViewerConfig};
use crate::fullscreen::{ExitReason, NativeFullscreen, NativeRequest};
use crate::input::{key_action, KeyAction};
use crate::loader::{self, LoadProgress};
use crate::render::render::Renderer;
use crate::render_loop::FrameTicket;
use crate::stats::{ActivityEntry, ActivityFeed, ActivityKind, Stats, AUTO_UPDATE_MS};
use crate::surface::RenderSurface;
use crate::viewer::{LoadOutcome, Viewer};
use crate::viewport::physical_size;
use crate::web::panel::{canvas_point, PanelInput, PanelOverlay};
use crate::web::{fetch, frame, fullscreen_api, WebTarget};

/// Largest canvas side requested from the page; the renderer clamps
/// further to what the device supports.
const MAX_CANVAS_SIDE: u32 = 8192;

type SharedViewer = Rc<RefCell<Viewer<WebTarget>>>;

/// Everything the event handlers share.
#[derive(Clone)]
struct Shell {
    viewer: SharedViewer,
    container: NodeRef<html::Div>,
    label: RwSignal<&'static str>,
    progress: RwSignal<Option<LoadProgress>>,
    feed: Option<RwSignal<ActivityFeed>>,
    settle_ms: u32,
}

impl Shell {
    fn note(&self, kind: ActivityKind, message: impl Into<String>) {
        if let Some(feed) = self.feed {
            let message = message.into();
            feed.update(|feed| feed.push(kind, message, js_sys::Date::now()));
        }
    }

    fn measure(&self) -> Option<(u32, u32)> {
        let div = self.container.get_untracked()?;
        let el: &web_sys::Element = &div;
        let ratio = web_sys::window()
            .map(|window| window.device_pixel_ratio())
            .unwrap_or(1.0);
        Some(physical_size(
            el.client_width() as f64,
            el.client_height() as f64,
            ratio,
            MAX_CANVAS_SIDE,
        ))
    }

    fn refit(&self) {
        if let Some((width, height)) = self.measure() {
            self.viewer.borrow_mut().resize(width, height);
        }
    }

    /// Re-measures once the page has settled after a fullscreen transition.
    fn settle_then_refit(&self) {
        let shell = self.clone();
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(shell.settle_ms).await;
            shell.refit();
        });
    }

    fn load(&self, path: String) {
        let shell = self.clone();
        spawn_local(async move {
            let ticket = shell.viewer.borrow_mut().begin_load();
            let progress = shell.progress;
            progress.set(Some(LoadProgress {
                loaded: 0,
                total: None,
            }));
            let result = fetch::fetch_bytes(&path, move |p| progress.set(Some(p)))
                .await
                .and_then(|bytes| loader::parse_model(&bytes));
            let outcome = shell.viewer.borrow_mut().finish_load(ticket, result);
            match outcome {
                LoadOutcome::Replaced(fitted) => {
                    progress.set(None);
                    shell.note(
                        ActivityKind::Model,
                        format!("Loaded {path} (scale {:.3})", fitted.scale),
                    );
                }
                LoadOutcome::Failed(err) => {
                    progress.set(None);
                    shell.note(ActivityKind::Error, format!("Failed to load {path}: {err}"));
                }
                LoadOutcome::Stale => {}
            }
        });
    }

    fn reset_view(&self) {
        self.viewer.borrow_mut().reset_view();
        self.note(ActivityKind::View, "View reset");
    }

    fn toggle_fullscreen(&self) {
        let strategy = self.viewer.borrow().config().fullscreen;
        match strategy {
            FullscreenStrategy::Native => self.toggle_native(),
            FullscreenStrategy::Panel { width, height } => {
                let exited = {
                    let mut viewer = self.viewer.borrow_mut();
                    if viewer.is_panel_active() {
                        Some(viewer.exit_panel(ExitReason::Toggle))
                    } else {
                        None
                    }
                };
                match exited {
                    Some(Some(ticket)) => self.after_panel_exit(ticket),
                    Some(None) => {}
                    None => self.enter_panel(width, height),
                }
            }
        }
    }

    fn toggle_native(&self) {
        let shell = self.clone();
        spawn_local(async move {
            let Some(document) = web_sys::window().and_then(|window| window.document()) else {
                return;
            };
            let request = shell
                .viewer
                .borrow()
                .native()
                .next_request(fullscreen_api::is_fullscreen(&document));
            let result = match request {
                NativeRequest::Enter => match shell.container.get_untracked() {
                    Some(div) => {
                        let el: &web_sys::Element = &div;
                        fullscreen_api::request(el).await
                    }
                    None => return,
                },
                NativeRequest::Exit => fullscreen_api::exit(&document).await,
            };
            match result {
                Ok(()) => {
                    let label = {
                        let mut viewer = shell.viewer.borrow_mut();
                        viewer.native_mut().request_resolved(request);
                        viewer.native().label()
                    };
                    shell.label.set(label);
                    shell.note(ActivityKind::View, label_note(request));
                    shell.settle_then_refit();
                }
                Err(err) => shell.viewer.borrow().native().request_failed(request, &err),
            }
        });
    }

    fn enter_panel(&self, width: u32, height: u32) {
        let handler = {
            let shell = self.clone();
            Rc::new(move |input: PanelInput| shell.panel_input(input)) as Rc<dyn Fn(PanelInput)>
        };
        let (overlay, canvas) = match PanelOverlay::open(width, height, handler) {
            Ok(opened) => opened,
            Err(err) => {
                error!("failed to open fullscreen panel: {err}");
                return;
            }
        };
        let target = WebTarget::with_overlay(canvas.clone(), overlay);
        let entered = self.viewer.borrow_mut().enter_panel(target);
        let (id, ticket) = match entered {
            Ok(entered) => entered,
            Err(err) => {
                error!("{err}");
                return;
            }
        };
        frame::run(self.viewer.clone(), ticket);
        self.label.set(NativeFullscreen::EXIT_LABEL);
        self.note(ActivityKind::View, "Entered fullscreen panel");

        let viewer = self.viewer.clone();
        spawn_local(async move {
            match Renderer::new(canvas, width, height).await {
                Ok(render) => {
                    if let Some(target) = viewer.borrow_mut().panel_target_mut(id) {
                        target.attach(render);
                    }
                }
                Err(err) => error!("failed to create panel renderer: {err:?}"),
            }
        });
        self.settle_then_refit();
    }

    fn after_panel_exit(&self, ticket: FrameTicket) {
        frame::run(self.viewer.clone(), ticket);
        self.label.set(NativeFullscreen::ENTER_LABEL);
        self.note(ActivityKind::View, "Left fullscreen panel");
        self.settle_then_refit();
    }

    fn panel_input(&self, input: PanelInput) {
        let exited = {
            let mut viewer = self.viewer.borrow_mut();
            match input {
                PanelInput::Click(hit) => viewer.on_panel_pointer(hit),
                PanelInput::Close => viewer.exit_panel(ExitReason::Toggle),
                PanelInput::PointerDown(x, y) => {
                    viewer.pointer_down(x, y);
                    None
                }
                PanelInput::PointerMove(x, y) => {
                    viewer.pointer_move(x, y);
                    None
                }
                PanelInput::PointerUp => {
                    viewer.pointer_up();
                    None
                }
                PanelInput::Wheel(delta_y) => {
                    viewer.wheel(delta_y);
                    None
                }
            }
        };
        if let Some(ticket) = exited {
            self.after_panel_exit(ticket);
        }
    }

    fn escape(&self) {
        let exited = self.viewer.borrow_mut().on_escape();
        if let Some(ticket) = exited {
            self.after_panel_exit(ticket);
        }
    }
}

fn label_note(request: NativeRequest) -> &'static str {
    match request {
        NativeRequest::Enter => "Entered fullscreen",
        NativeRequest::Exit => "Left fullscreen",
    }
}

#[component]
fn StatsPanel(stats: RwSignal<Stats>, on_action: Rc<dyn Fn()>) -> impl IntoView {
    view! {
        <div class = "flex items-center gap-6 p-4">
            <div class = "text-center">
                <div class = "text-2xl font-bold">{move || stats.get().items}</div>
                <div class = "text-sm text-gray-500">"Items"</div>
            </div>
            <div class = "text-center">
                <div class = "text-2xl font-bold">{move || stats.get().actions}</div>
                <div class = "text-sm text-gray-500">"Actions"</div>
            </div>
            <div class = "text-center">
                <div class = "text-2xl font-bold">{move || stats.get().total}</div>
                <div class = "text-sm text-gray-500">"Total"</div>
            </div>
            <button
                class = "px-4 py-2 rounded-full border border-emerald-600 bg-emerald-100 hover:bg-emerald-200"
                on:click = move |_| on_action()
            >
                "Action"
            </button>
        </div>
    }
}

#[component]
fn ActivityList(feed: RwSignal<ActivityFeed>) -> impl IntoView {
    view! {
        <ul role = "list" class = "w-64 max-h-full overflow-y-auto divide-y divide-gray-100 shadow rounded bg-white">
            <For
                each = move || feed.get().entries().cloned().collect::<Vec<_>>()
                key = |entry| entry.id
                children = move |entry: ActivityEntry| {
                    let at = js_sys::Date::new(&entry.at_ms.into());
                    let time = String::from(at.to_locale_time_string("default"));
                    view! {
                        <li class = "p-2 text-sm">
                            <span class = "text-gray-400 mr-2">{time}</span>
                            {entry.message}
                        </li>
                    }
                }
            />
        </ul>
    }
}

#[component]
pub fn App(config: ViewerConfig) -> impl IntoView {
    let model_path = config.model_path.clone();
    let counters = config.counters;
    let auto_update = config.auto_update;
    let strategy = config.fullscreen;
    let settle_ms = config.settle_delay_ms;

    let canvas = html::canvas();
    let raw_canvas = {
        let el: &web_sys::HtmlCanvasElement = &canvas;
        el.clone()
    };
    let viewer: SharedViewer = Rc::new(RefCell::new(Viewer::new(
        config.clone(),
        WebTarget::new(raw_canvas.clone()),
    )));

    let shell = Shell {
        viewer: viewer.clone(),
        container: create_node_ref::<html::Div>(),
        label: create_rw_signal(NativeFullscreen::ENTER_LABEL),
        progress: create_rw_signal(None),
        feed: config.activity_feed.then(|| create_rw_signal(ActivityFeed::default())),
        settle_ms,
    };

    let stats = create_rw_signal(Stats::default());
    let rng = Rc::new(RefCell::new(SmallRng::from_entropy()));
    let primary_action: Rc<dyn Fn()> = {
        let shell = shell.clone();
        let rng = rng.clone();
        Rc::new(move || {
            let added = stats
                .try_update(|stats| stats.record_action(&mut *rng.borrow_mut()))
                .unwrap_or(0);
            shell.note(ActivityKind::Action, format!("Action added {added} items"));
        })
    };

    if counters && auto_update {
        let shell = shell.clone();
        gloo_timers::callback::Interval::new(AUTO_UPDATE_MS, move || {
            if let Some(Some(added)) = stats.try_update(|stats| stats.auto_tick(&mut *rng.borrow_mut())) {
                shell.note(ActivityKind::Action, format!("Auto update added {added} items"));
            }
        })
        .forget();
    }

    let canvas = {
        let down = (viewer.clone(), raw_canvas.clone());
        let moved = (viewer.clone(), raw_canvas.clone());
        let up = viewer.clone();
        let wheel = viewer.clone();
        canvas
            .attr("class", "w-full h-full block touch-none")
            .on(ev::pointerdown, move |ev| {
                let (x, y) = canvas_point(&down.1, &ev);
                down.0.borrow_mut().pointer_down(x, y);
            })
            .on(ev::pointermove, move |ev| {
                let (x, y) = canvas_point(&moved.1, &ev);
                moved.0.borrow_mut().pointer_move(x, y);
            })
            .on(ev::pointerup, move |_| up.borrow_mut().pointer_up())
            .on(ev::wheel, move |ev| {
                ev.prevent_default();
                wheel.borrow_mut().wheel(ev.delta_y());
            })
    };

    {
        let shell = shell.clone();
        let primary_action = primary_action.clone();
        window_event_listener(ev::keydown, move |ev| {
            match key_action(&ev.key(), counters) {
                Some(KeyAction::PrimaryAction) => {
                    ev.prevent_default();
                    primary_action();
                }
                Some(KeyAction::ToggleFullscreen) => shell.toggle_fullscreen(),
                Some(KeyAction::ExitFullscreen) => shell.escape(),
                None => {}
            }
        });
    }
    {
        let shell = shell.clone();
        window_event_listener(ev::resize, move |_| shell.refit());
    }
    if strategy == FullscreenStrategy::Native {
        if let Some(document) = web_sys::window().and_then(|window| window.document()) {
            let shell = shell.clone();
            fullscreen_api::listen(&document, move |platform_fullscreen| {
                let label = {
                    let mut viewer = shell.viewer.borrow_mut();
                    let changed = viewer.native_mut().on_change(platform_fullscreen);
                    let label = viewer.native().label();
                    changed.then_some(label)
                };
                if let Some(label) = label {
                    shell.label.set(label);
                }
                shell.settle_then_refit();
            });
        }
    }

    let on_mount = {
        let shell = shell.clone();
        move |_| {
            shell.refit();
            let (width, height) = shell.viewer.borrow().primary().size();
            let viewer = shell.viewer.clone();
            let canvas = raw_canvas.clone();
            spawn_local(async move {
                match Renderer::new(canvas, width, height).await {
                    Ok(render) => viewer.borrow_mut().primary_mut().attach(render),
                    Err(err) => error!("create renderer failed by {err:?}"),
                }
            });
            let ticket = shell.viewer.borrow_mut().start_primary_loop();
            frame::run(shell.viewer.clone(), ticket);
            log!("loading {model_path}");
            shell.load(model_path.clone());
        }
    };

    let reset = {
        let shell = shell.clone();
        move |_| shell.reset_view()
    };
    let toggle = {
        let shell = shell.clone();
        move |_| shell.toggle_fullscreen()
    };
    let label = shell.label;
    let progress = shell.progress;
    let feed = shell.feed;
    let container = shell.container;

    view! {
        <div class = "flex flex-col w-full h-full">
            {counters.then(|| view! { <StatsPanel stats on_action = primary_action/> })}
            <div class = "flex flex-1 min-h-0">
                <div node_ref = container class = "relative flex-1 min-h-0 bg-black">
                    {canvas}
                    <div class = "absolute left-2 top-2 text-sm text-gray-300">
                        {move || progress.get().map(progress_text)}
                    </div>
                    <div class = "absolute right-2 bottom-2 flex gap-2">
                        <button
                            class = "px-3 py-1 rounded-full border border-emerald-600 bg-emerald-100 hover:bg-emerald-200"
                            on:click = reset
                        >
                            "Reset View"
                        </button>
                        <button
                            class = "px-3 py-1 rounded-full border border-emerald-600 bg-emerald-100 hover:bg-emerald-200"
                            on:click = toggle
                        >
                            {move || label.get()}
                        </button>
                    </div>
                </div>
                {feed.map(|feed| view! { <ActivityList feed/> })}
            </div>
        </div>
    }
    .on_mount(on_mount)
}

fn progress_text(progress: LoadProgress) -> String {
    match progress.fraction() {
        Some(fraction) => format!("Loading model... {:.0}%", fraction * 100.0),
        None => format!("Loading model... {} KB", progress.loaded / 1024),
    }
}
