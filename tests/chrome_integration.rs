#![cfg(feature = "chrome")]

use browser_chain::{BrowserError, Session, SessionOptions, js};
use std::time::Duration;

const TODO_PAGE: &str = r#"<html><body>
<form id="add"><input name="title" value=""><button type="button" id="save">Add</button></form>
<ul id="todos"></ul>
<script>
document.getElementById('save').addEventListener('click', function () {
    var input = document.querySelector('input[name=title]');
    setTimeout(function () {
        var item = document.createElement('li');
        item.className = 'todo';
        item.textContent = input.value;
        document.getElementById('todos').appendChild(item);
    }, 200);
});
</script>
</body></html>"#;

fn data_url(html: &str) -> String {
    format!("data:text/html,{}", urlencoding::encode(html))
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_todo_flow() -> anyhow::Result<()> {
    init_logging();

    let options = SessionOptions::new().debug(true).timeout(Duration::from_secs(5));
    let mut session = Session::chrome(options);

    {
        let mut page = session.root();
        page.open(data_url(TODO_PAGE));

        let mut form = page.scope("form#add");
        form.select("input[name=title]").set_value("write docs");
        form.select("#save").click();

        let mut list = page.scope("ul#todos");
        list.wait("li.todo");
        list.select("li.todo").test().count(1);
        list.select("li.todo").test().text("write docs");
        list.select("li.todo").test().not().has_class("done");
        list.select("li.todo").test().visible();
    }
    session.run()?;

    session.exit()?;
    Ok(())
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_timeout_and_assertion_errors() -> anyhow::Result<()> {
    init_logging();

    let mut session = Session::chrome(SessionOptions::new().timeout(Duration::from_millis(300)));

    session.root().open(data_url("<p id='only'>hi</p>")).wait("#never");
    assert!(matches!(session.run(), Err(BrowserError::Timeout { .. })));

    session.root().select("#only").test().text("bye");
    let error = session.run().unwrap_err();
    assert!(error.to_string().contains("#only"));

    session
        .root()
        .wait(js("function () { return document.readyState === 'complete'; }"))
        .test()
        .eval("function () { return document.title === ''; }", Vec::new());
    session.run()?;

    session.exit()?;
    Ok(())
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_screenshot_writes_png() -> anyhow::Result<()> {
    init_logging();

    let path = std::env::temp_dir().join("browser-chain-screenshot.png");
    let _ = std::fs::remove_file(&path);

    let mut session = Session::chrome(SessionOptions::new().viewport(640, 480));
    session.root().open(data_url("<h1>Screenshot</h1>")).screenshot(&path);
    session.run()?;
    session.exit()?;

    let bytes = std::fs::read(&path)?;
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    Ok(())
}
