use anyhow::Context;
use kg::input::StdinSource;
use kg::ui::{create_terminal, RawModeGuard};
use kg::{error, logging, App, Config};

fn main() -> anyhow::Result<()> {
    let (config, config_error) = Config::load_default();
    logging::init(&config.logging);
    error::setup_panic_handler();

    let path = std::env::args().nth(1);

    // ガードは main を抜ける時に破棄されるので、エラー表示の前に端末が戻る
    let guard = RawModeGuard::new().context("kg needs an interactive terminal")?;
    let source = StdinSource::spawn().context("failed to start input reader")?;
    let mut app = App::new(&config, source);

    if let Some(path) = &path {
        app.open(path).with_context(|| format!("cannot open {}", path))?;
    }
    match config_error {
        Some(err) => {
            log::warn!("{}", err);
            app.set_message(err.to_string());
        }
        None => app.set_message("HELP: C-x C-s = save | C-x C-c = quit | C-s = search | C-_ = undo"),
    }

    let mut terminal = create_terminal()?;
    let result = app.run(&mut terminal);

    drop(terminal);
    drop(guard);
    result.context("editor session failed")
}
