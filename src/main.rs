//! Arcade Trio entry point
//!
//! Browser: wires the home cards, back and restart buttons to the view
//! router. Native: plays a short headless round of each game and logs the
//! outcomes.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use arcade_trio::platform::web::browser_host;
    use arcade_trio::{Settings, ViewRouter};

    fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
    }

    /// Toggle between the home grid and the game view
    fn show_game(document: &Document, title: Option<&str>) -> Result<(), JsValue> {
        let home = element(document, "home")?;
        let game = element(document, "game")?;
        match title {
            Some(title) => {
                element(document, "gameTitle")?.set_text_content(Some(title));
                home.class_list().add_1("hidden")?;
                game.class_list().remove_1("hidden")?;
            }
            None => {
                game.class_list().add_1("hidden")?;
                home.class_list().remove_1("hidden")?;
            }
        }
        Ok(())
    }

    fn on_click(target: &Element, mut handler: impl FnMut() + 'static) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
        target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_cards(document: &Document, router: &Rc<RefCell<ViewRouter>>) -> Result<(), JsValue> {
        let cards = document.query_selector_all(".card")?;
        for i in 0..cards.length() {
            let Some(card) = cards.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(name) = card.get_attribute("data-game") else {
                log::warn!("card without data-game");
                continue;
            };
            let router = Rc::clone(router);
            let document = document.clone();
            on_click(&card, move || {
                let title = {
                    let mut router = router.borrow_mut();
                    router.open_named(&name);
                    router.title()
                };
                if let Err(e) = show_game(&document, title) {
                    log::error!("view switch failed: {e:?}");
                }
            })?;
        }
        Ok(())
    }

    fn setup_controls(document: &Document, router: &Rc<RefCell<ViewRouter>>) -> Result<(), JsValue> {
        {
            let router = Rc::clone(router);
            let doc = document.clone();
            on_click(&element(document, "backBtn")?, move || {
                router.borrow_mut().back();
                if let Err(e) = show_game(&doc, None) {
                    log::error!("view switch failed: {e:?}");
                }
            })?;
        }
        {
            let router = Rc::clone(router);
            on_click(&element(document, "restartBtn")?, move || {
                router.borrow().restart();
            })?;
        }
        Ok(())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Arcade Trio starting...");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        log::info!("Seed: {seed}");

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let host = browser_host("stage")?;
        let router = Rc::new(RefCell::new(ViewRouter::new(host, settings, seed)));

        setup_cards(&document, &router)?;
        setup_controls(&document, &router)?;

        log::info!("Arcade Trio ready");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::Duration;

    use arcade_trio::input::Key;
    use arcade_trio::platform::headless::HeadlessHost;
    use arcade_trio::sim::GameKind;
    use arcade_trio::{Settings, ViewRouter};

    env_logger::init();
    log::info!("Arcade Trio (native) starting...");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or(42);
    let host = HeadlessHost::new();
    let mut router = ViewRouter::new(host.host(), settings, seed);

    // Snake runs right until it meets the wall
    router.open(GameKind::Snake);
    host.scheduler.advance(Duration::from_secs(5));

    // Paddle held left; the ball eventually gets past it
    router.open(GameKind::Bricks);
    host.keyboard.press(Key::ArrowLeft);
    host.scheduler.advance(Duration::from_secs(60));
    host.keyboard.release(Key::ArrowLeft);

    // Letters in frequency order until the round ends
    router.open(GameKind::Hangman);
    for letter in "EAIORTNSLCUDPMHGBFYWKVXZJQ".chars() {
        host.keyboard.press(Key::Letter(letter));
        if router.active_status().is_some_and(|s| s.is_terminal()) {
            break;
        }
    }

    router.back();

    for report in host.notifier.reports() {
        let score = report.score.map(|s| format!(" (score {s})")).unwrap_or_default();
        log::info!("{}: {}{score}", report.kind.title(), report.message());
    }
    log::info!(
        "{} rounds finished in {:.1}s of simulated time",
        host.notifier.count(),
        host.scheduler.now().as_secs_f32()
    );
}
