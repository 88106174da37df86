use std::sync::Arc;

use graphwalk::prelude::*;
use graphwalk_scene::{palette, Scene};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod canvas;
mod storage;

use canvas::{CanvasSurface, CANVAS_ID, TIP_CANVAS_ID};
use storage::{local_storage_get, local_storage_set};

const STORAGE_KEY_GRAPH: &str = "graphwalk.graph_json.v1";

pub fn start() {
    console_error_panic_hook::set_once();
    mount_to_body(|| view! { <App /> });
}

#[component]
fn App() -> impl IntoView {
    let runtime = StoredValue::new(AppRuntime::new(graphwalk::cities::us_cities()));

    let (names, set_names) = signal(runtime.with_value(|r| r.names()));
    let (algorithm, set_algorithm) = signal(runtime.with_value(|r| r.algorithm));
    let (from, set_from) = signal(runtime.with_value(|r| r.from.clone()));
    let (to, set_to) = signal(runtime.with_value(|r| r.to.clone()));
    let (hovered, set_hovered) = signal::<Option<String>>(None);
    let (progress, set_progress) = signal(runtime.with_value(|r| r.progress()));
    let (status, set_status) = signal(String::new());

    let (interval_id, set_interval_id) = signal::<Option<i32>>(None);

    let report = move |msg: String| {
        web_sys::console::warn_1(&JsValue::from_str(&msg));
        set_status.set(msg);
    };

    let redraw = move || {
        let mut res = Ok(false);
        runtime.update_value(|r| res = r.redraw());
        if let Err(e) = res {
            report(format!("draw failed: {e}"));
        }
    };

    let fit = move || {
        let mut res = Ok(());
        runtime.update_value(|r| res = r.fit());
        match res {
            Ok(()) => redraw(),
            Err(e) => report(format!("resize failed: {e}")),
        }
    };

    let refresh = move || {
        set_progress.set(runtime.with_value(|r| r.progress()));
        redraw();
    };

    // Clears the timer without touching the status line.
    let halt = move || {
        if let Some(id) = interval_id.get_untracked() {
            if let Some(w) = web_sys::window() {
                w.clear_interval_with_handle(id);
            }
            set_interval_id.set(None);
        }
    };

    let do_tick = move || {
        let mut out = Ok(Status::Searching);
        runtime.update_value(|r| out = r.step());
        match out {
            Ok(Status::Searching) => {}
            Ok(done) => {
                halt();
                set_status.set(done.to_string());
            }
            Err(e) => {
                halt();
                report(format!("search failed: {e}"));
            }
        }
        refresh();
    };

    let do_reset = move || {
        halt();
        runtime.update_value(|r| r.reset());
        refresh();
        set_status.set("reset".to_string());
    };

    let do_start = move || {
        if interval_id.get_untracked().is_some() {
            return;
        }
        if runtime.with_value(|r| r.is_done()) {
            do_reset();
        }
        let window = match web_sys::window() {
            Some(w) => w,
            None => {
                set_status.set("no window".to_string());
                return;
            }
        };

        let cb = Closure::wrap(Box::new(move || {
            do_tick();
        }) as Box<dyn FnMut()>);

        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            palette::DEFAULT_TICK_MS,
        ) {
            Ok(id) => {
                cb.forget();
                set_interval_id.set(Some(id));
                set_status.set("running".to_string());
            }
            Err(_) => set_status.set("failed to start interval".to_string()),
        }
    };

    let do_stop = move || {
        if interval_id.get_untracked().is_some() {
            halt();
            set_status.set("stopped".to_string());
        }
    };

    on_cleanup(move || halt());

    let choose_algorithm = move |a: Algorithm| {
        halt();
        runtime.update_value(|r| r.set_algorithm(a));
        set_algorithm.set(a);
        refresh();
        set_status.set(format!("algorithm: {}", a.label()));
    };

    let choose_from = move |name: String| {
        halt();
        runtime.update_value(|r| r.set_from(name.clone()));
        set_from.set(name);
        refresh();
    };

    let choose_to = move |name: String| {
        halt();
        runtime.update_value(|r| r.set_to(name.clone()));
        set_to.set(name);
        refresh();
    };

    let do_save = move || match runtime.with_value(|r| r.graph.to_json()) {
        Ok(json) => match local_storage_set(STORAGE_KEY_GRAPH, &json) {
            Ok(()) => set_status.set(format!("saved {} chars to localStorage", json.len())),
            Err(e) => report(format!("save failed: {e}")),
        },
        Err(e) => report(format!("save failed: {e}")),
    };

    let do_load = move || match local_storage_get(STORAGE_KEY_GRAPH) {
        Ok(Some(json)) => match Graph::from_json(&json) {
            Ok(graph) => {
                halt();
                let count = graph.len();
                runtime.update_value(|r| r.set_graph(graph));
                set_names.set(runtime.with_value(|r| r.names()));
                set_from.set(runtime.with_value(|r| r.from.clone()));
                set_to.set(runtime.with_value(|r| r.to.clone()));
                set_hovered.set(None);
                refresh();
                set_status.set(format!("loaded {count} cities from localStorage"));
            }
            Err(e) => report(format!("load failed: {e}")),
        },
        Ok(None) => set_status.set("no saved graph in localStorage".to_string()),
        Err(e) => report(format!("load failed: {e}")),
    };

    let hover = move |name: Option<String>| {
        runtime.update_value(|r| {
            let id = name.as_deref().and_then(|n| r.scene.id_of(n));
            r.scene.set_hovered(id);
        });
        if hovered.get_untracked() != name {
            set_hovered.set(name);
        }
        redraw();
    };

    let on_canvas_move = move |x: f64, y: f64| {
        let mut hit = None;
        runtime.update_value(|r| {
            let id = r.scene.city_at(x, y);
            r.scene.set_hovered(id);
            hit = id.and_then(|id| {
                Some((
                    r.scene.name(id)?.to_owned(),
                    *r.scene.cities().get(&id)?,
                    r.scene.tooltip(id)?,
                ))
            });
        });

        let res = match &hit {
            Some((_, city, text)) => canvas::canvas_by_id(CANVAS_ID)
                .and_then(|map| canvas::show_tooltip(&map, city, text)),
            None => canvas::hide_tooltip(),
        };
        if let Err(e) = res {
            report(e);
        }

        let name = hit.map(|(name, _, _)| name);
        if hovered.get_untracked() != name {
            set_hovered.set(name);
        }
        redraw();
    };

    let on_canvas_leave = move || {
        if let Err(e) = canvas::hide_tooltip() {
            report(e);
        }
        hover(None);
    };

    // The canvas exists once the view is mounted.
    Effect::new(move |_| fit());

    if let Some(window) = web_sys::window() {
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| fit()) as Box<dyn FnMut(_)>);
        if window
            .add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
            .is_ok()
        {
            cb.forget();
        }
    }

    view! {
        <main>
            <div id="left-list-wrapper">
                <p id="cities-list-title">"Cities:"</p>
                <ul id="cities-list">
                    <For
                        each=move || names.get()
                        key=|name| name.clone()
                        children=move |name| {
                            let over = name.clone();
                            let styled = name.clone();
                            view! {
                                <li
                                    class="city-list-item"
                                    style=move || {
                                        let colour = if hovered.get().as_deref() == Some(styled.as_str()) {
                                            palette::LIST_HOVER_COLOR
                                        } else {
                                            palette::TEXT_COLOR
                                        };
                                        format!("color: {colour};")
                                    }
                                    on:mouseover=move |_| hover(Some(over.clone()))
                                    on:mouseout=move |_| hover(None)
                                >
                                    {name}
                                </li>
                            }
                        }
                    />
                </ul>
            </div>

            <section>
                <h1 style="margin: 0 0 8px 0;">"graphwalk"</h1>
                <canvas
                    id=CANVAS_ID
                    on:mousemove=move |ev| on_canvas_move(ev.offset_x() as f64, ev.offset_y() as f64)
                    on:mouseleave=move |_| on_canvas_leave()
                ></canvas>
                <canvas id=TIP_CANVAS_ID height="20"></canvas>

                <div class="controls">
                    <label>
                        "Algorithm "
                        <select on:change=move |ev| {
                            if let Ok(a) = event_target_value(&ev).parse::<Algorithm>() {
                                choose_algorithm(a);
                            }
                        }>
                            {Algorithm::ALL
                                .into_iter()
                                .map(|a| {
                                    view! {
                                        <option
                                            value=a.name()
                                            prop:selected=move || algorithm.get() == a
                                        >
                                            {a.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </label>
                    <label>
                        "From "
                        // Options carry the selection: the select has none until they exist.
                        <select on:change=move |ev| choose_from(event_target_value(&ev))>
                            <For
                                each=move || names.get()
                                key=|name| name.clone()
                                children=move |name| {
                                    let current = name.clone();
                                    view! {
                                        <option
                                            value=name.clone()
                                            prop:selected=move || from.get() == current
                                        >
                                            {name}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </label>
                    <label>
                        "To "
                        <select on:change=move |ev| choose_to(event_target_value(&ev))>
                            <For
                                each=move || names.get()
                                key=|name| name.clone()
                                children=move |name| {
                                    let current = name.clone();
                                    view! {
                                        <option
                                            value=name.clone()
                                            prop:selected=move || to.get() == current
                                        >
                                            {name}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </label>
                </div>

                <div class="controls">
                    <button on:click=move |_| do_tick()>"Step"</button>
                    <button on:click=move |_| do_start()>"Run"</button>
                    <button on:click=move |_| do_stop()>"Stop"</button>
                    <button on:click=move |_| do_reset()>"Reset"</button>
                    <button on:click=move |_| do_save()>"Save (localStorage)"</button>
                    <button on:click=move |_| do_load()>"Load (localStorage)"</button>
                </div>

                <Stat label="Search" value=move || progress.get() />
                <Stat label="Status" value=move || status.get() />
            </section>
        </main>
    }
}

#[component]
fn Stat(label: &'static str, value: impl Fn() -> String + Send + 'static) -> impl IntoView {
    view! {
        <div style="display: flex; justify-content: space-between; border: 1px solid #555; padding: 8px 12px; margin-top: 6px; border-radius: 8px;">
            <div style="font-weight: 600;">{label}</div>
            <div style="font-variant-numeric: tabular-nums;">{value}</div>
        </div>
    }
}

struct AppRuntime {
    graph: Arc<Graph>,
    scene: Scene,
    algorithm: Algorithm,
    from: String,
    to: String,
    search: Option<Box<dyn Search + Send + Sync>>,
}

impl AppRuntime {
    fn new(graph: Graph) -> Self {
        let scene = Scene::new(&graph, 0.0, 0.0);
        let (from, to) = scene
            .default_endpoints()
            .map(|(a, b)| (a.to_owned(), b.to_owned()))
            .unwrap_or_default();
        Self {
            graph: Arc::new(graph),
            scene,
            algorithm: Algorithm::ShortestPath,
            from,
            to,
            search: None,
        }
    }

    fn names(&self) -> Vec<String> {
        self.scene
            .sorted_names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Swaps in a new graph, keeping the algorithm and canvas size.
    fn set_graph(&mut self, graph: Graph) {
        let (width, height) = (self.scene.width(), self.scene.height());
        let algorithm = self.algorithm;
        *self = Self::new(graph);
        self.algorithm = algorithm;
        let graph = Arc::clone(&self.graph);
        self.scene.resize(&graph, width, height);
    }

    fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
        self.reset();
    }

    fn set_from(&mut self, name: String) {
        self.from = name;
        self.reset();
    }

    fn set_to(&mut self, name: String) {
        self.to = name;
        self.reset();
    }

    fn reset(&mut self) {
        self.search = None;
        self.scene.clear_search();
    }

    fn is_done(&self) -> bool {
        self.search.as_ref().is_some_and(|s| s.state().is_done())
    }

    /// One half-step, starting a new search on first use.
    fn step(&mut self) -> Result<Status, String> {
        if self.search.is_none() {
            let search = Graph::search_shared(
                Arc::clone(&self.graph),
                self.algorithm,
                &self.from,
                &self.to,
            )
            .map_err(|e| e.to_string())?;
            self.search = Some(search);
        }
        let Some(search) = self.search.as_mut() else {
            return Err("no search".to_string());
        };
        let status = search.step();
        self.scene.sync(&**search);
        Ok(status)
    }

    fn progress(&self) -> String {
        let Some(search) = &self.search else {
            return format!("{}: ready", self.algorithm.label());
        };
        let mut line = format!(
            "{}: {} after {} steps",
            self.algorithm.label(),
            search.status(),
            search.steps()
        );
        if let Some(route) = search.route() {
            line.push_str(&format!("; {route} (total {:.2})", route.total()));
        }
        line
    }

    fn fit(&mut self) -> Result<(), String> {
        let canvas = canvas::canvas_by_id(CANVAS_ID)?;
        let (width, height) = canvas::fit_to_window(&canvas)?;
        let graph = Arc::clone(&self.graph);
        self.scene.resize(&graph, width, height);
        Ok(())
    }

    fn redraw(&mut self) -> Result<bool, String> {
        let canvas = canvas::canvas_by_id(CANVAS_ID)?;
        let mut surface = CanvasSurface::new(&canvas)?;
        self.scene.draw(&mut surface)
    }
}
