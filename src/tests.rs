use super::*;

use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn today() -> NaiveDate {
    date(2026, 8, 7)
}

const TODO_FORM_HTML: &str = r#"
    <body>
      <div class="page-content">
        <form id="todoForm" action="/todos" method="post">
          <div id="titleField" class="mdl-textfield">
            <input id="title" name="title" required>
            <span class="mdl-textfield__error"></span>
          </div>
          <div id="dueField" class="mdl-textfield">
            <input id="dueDate" type="date" name="dueDate">
            <span class="mdl-textfield__error"></span>
          </div>
          <button id="save" type="submit">Save</button>
        </form>
      </div>
    </body>
    "#;

const SIGNUP_FORM_HTML: &str = r#"
    <body>
      <div class="page-content">
        <form id="signupForm" action="/register" method="post">
          <div id="emailField" class="mdl-textfield">
            <input id="email" type="email" name="email">
            <span class="mdl-textfield__error"></span>
          </div>
          <div id="passwordField" class="mdl-textfield">
            <input id="password" type="password" name="password" required>
            <span class="mdl-textfield__error"></span>
          </div>
          <div id="confirmField" class="mdl-textfield">
            <input id="confirmPassword" type="password" name="confirmPassword" required>
            <span class="mdl-textfield__error"></span>
          </div>
          <button id="register" type="submit">Register</button>
        </form>
      </div>
    </body>
    "#;

const SEARCH_PAGE_HTML: &str = r#"
    <body>
      <div class="page-content">
        <form id="searchForm" action="/todos" method="get">
          <input type="text" name="search" value="milk">
          <select name="completed">
            <option value="">All</option>
            <option value="false">Open</option>
            <option value="true">Done</option>
          </select>
          <button id="clearSearch" type="button">Clear</button>
        </form>
        <a class="pagination-link" href="/todos?page=2">Next</a>
      </div>
    </body>
    "#;

#[test]
fn blank_required_field_cancels_submission_and_annotates() -> Result<()> {
    let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
    page.click("#save")?;

    assert!(page.submissions().is_empty());
    assert!(page.has_class("#titleField", "is-invalid")?);
    page.assert_text(".mdl-textfield__error", "This field is required.")?;
    Ok(())
}

#[test]
fn filled_required_field_submission_proceeds() -> Result<()> {
    let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
    page.type_text("#title", "Buy milk")?;
    page.click("#save")?;

    assert_eq!(page.submissions().len(), 1);
    let submission = &page.submissions()[0];
    assert_eq!(submission.action, "/todos");
    assert_eq!(submission.method, "post");
    assert!(submission
        .fields
        .contains(&("title".to_string(), "Buy milk".to_string())));
    assert!(!page.has_class("#titleField", "is-invalid")?);
    Ok(())
}

#[test]
fn whitespace_only_value_fails_required_rule() -> Result<()> {
    let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
    page.type_text("#title", "   ")?;
    page.click("#save")?;

    assert!(page.submissions().is_empty());
    assert!(page.has_class("#titleField", "is-invalid")?);
    Ok(())
}

#[test]
fn correcting_a_field_clears_its_annotation_on_next_pass() -> Result<()> {
    let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
    page.click("#save")?;
    assert!(page.has_class("#titleField", "is-invalid")?);

    page.type_text("#title", "Buy milk")?;
    page.click("#save")?;
    assert!(!page.has_class("#titleField", "is-invalid")?);
    assert_eq!(page.submissions().len(), 1);
    Ok(())
}

#[test]
fn all_violations_are_reported_in_one_pass() -> Result<()> {
    let mut page = Page::from_html_with_today(SIGNUP_FORM_HTML, today())?;
    page.type_text("#email", "not-an-email")?;
    page.type_text("#password", "x1")?;
    page.type_text("#confirmPassword", "x2")?;
    page.click("#register")?;

    assert!(page.submissions().is_empty());
    assert!(page.has_class("#emailField", "is-invalid")?);
    assert!(page.has_class("#confirmField", "is-invalid")?);
    Ok(())
}

#[test]
fn invalid_email_annotates_field() -> Result<()> {
    let mut page = Page::from_html_with_today(SIGNUP_FORM_HTML, today())?;
    page.type_text("#email", "a@b")?;
    page.type_text("#password", "secret")?;
    page.type_text("#confirmPassword", "secret")?;
    page.click("#register")?;

    assert!(page.submissions().is_empty());
    assert!(page.has_class("#emailField", "is-invalid")?);
    Ok(())
}

#[test]
fn empty_email_field_is_not_checked() -> Result<()> {
    let mut page = Page::from_html_with_today(SIGNUP_FORM_HTML, today())?;
    page.type_text("#password", "secret")?;
    page.type_text("#confirmPassword", "secret")?;
    page.click("#register")?;

    assert_eq!(page.submissions().len(), 1);
    assert!(!page.has_class("#emailField", "is-invalid")?);
    Ok(())
}

#[test]
fn email_predicate_matches_expected_strings() {
    assert!(is_valid_email("a@b.co"));
    assert!(is_valid_email("first.last@example.org"));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("a b@c.com"));
    assert!(!is_valid_email("a@b@c.com"));
    assert!(!is_valid_email("@b.co"));
    assert!(!is_valid_email("a@."));
    assert!(!is_valid_email(""));
}

#[test]
fn password_mismatch_attaches_error_to_confirmation_field() -> Result<()> {
    let mut page = Page::from_html_with_today(SIGNUP_FORM_HTML, today())?;
    page.type_text("#password", "x1")?;
    page.type_text("#confirmPassword", "x2")?;
    page.click("#register")?;

    assert!(page.submissions().is_empty());
    assert!(page.has_class("#confirmField", "is-invalid")?);
    assert!(!page.has_class("#passwordField", "is-invalid")?);
    Ok(())
}

#[test]
fn matching_passwords_submit() -> Result<()> {
    let mut page = Page::from_html_with_today(SIGNUP_FORM_HTML, today())?;
    page.type_text("#password", "x1")?;
    page.type_text("#confirmPassword", "x1")?;
    page.click("#register")?;

    assert_eq!(page.submissions().len(), 1);
    assert!(!page.has_class("#confirmField", "is-invalid")?);
    Ok(())
}

#[test]
fn due_date_in_the_past_is_rejected() -> Result<()> {
    let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
    page.type_text("#title", "Buy milk")?;
    page.type_text("#dueDate", "2026-08-06")?;
    page.click("#save")?;

    assert!(page.submissions().is_empty());
    assert!(page.has_class("#dueField", "is-invalid")?);
    Ok(())
}

#[test]
fn due_date_today_and_tomorrow_are_accepted() -> Result<()> {
    for value in ["2026-08-07", "2026-08-08"] {
        let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
        page.type_text("#title", "Buy milk")?;
        page.type_text("#dueDate", value)?;
        page.submit("#todoForm")?;
        assert_eq!(page.submissions().len(), 1, "due date {value}");
        assert!(!page.has_class("#dueField", "is-invalid")?);
    }
    Ok(())
}

#[test]
fn unparseable_due_date_passes_the_rule() -> Result<()> {
    let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
    page.type_text("#title", "Buy milk")?;
    page.type_text("#dueDate", "next tuesday")?;
    page.click("#save")?;

    assert_eq!(page.submissions().len(), 1);
    assert!(!page.has_class("#dueField", "is-invalid")?);
    Ok(())
}

#[test]
fn validation_only_touches_the_submitting_form() -> Result<()> {
    let html = r#"
        <form id="first" action="/a" method="post">
          <div id="firstField" class="mdl-textfield">
            <input name="title" required>
            <span class="mdl-textfield__error"></span>
          </div>
          <button id="firstSave" type="submit">Save</button>
        </form>
        <form id="second" action="/b" method="post">
          <div id="secondField" class="mdl-textfield">
            <input name="note" required>
            <span class="mdl-textfield__error"></span>
          </div>
        </form>
        "#;
    let mut page = Page::from_html_with_today(html, today())?;
    page.click("#firstSave")?;

    assert!(page.has_class("#firstField", "is-invalid")?);
    assert!(!page.has_class("#secondField", "is-invalid")?);
    Ok(())
}

#[test]
fn validate_form_reports_without_submitting() -> Result<()> {
    let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
    assert!(!page.validate_form("#todoForm")?);
    page.type_text("#title", "Buy milk")?;
    assert!(page.validate_form("#todoForm")?);
    assert!(page.submissions().is_empty());

    let err = page.validate_form("#title").expect_err("not a form");
    match err {
        Error::TypeMismatch { expected, .. } => assert_eq!(expected, "form"),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn message_cards_fade_and_detach_on_schedule() -> Result<()> {
    let html = r#"
        <div class="page-content">
          <div id="flash" class="message-card success-message">Saved</div>
        </div>
        "#;
    let mut page = Page::from_html_with_today(html, today())?;

    page.advance_time(4999)?;
    assert!(page.exists("#flash")?);
    assert_eq!(page.style_of("#flash", "opacity")?, "");

    page.advance_time(1)?;
    assert!(page.exists("#flash")?);
    assert_eq!(page.style_of("#flash", "opacity")?, "0");
    assert_eq!(
        page.style_of("#flash", "transition")?,
        "opacity 0.5s ease-out"
    );

    page.advance_time(500)?;
    assert!(!page.exists("#flash")?);
    Ok(())
}

#[test]
fn detaching_an_already_detached_message_is_a_no_op() -> Result<()> {
    let html = r#"
        <div class="page-content">
          <div id="outer" class="message-card">
            <div id="inner" class="message-card">nested</div>
          </div>
        </div>
        "#;
    let mut page = Page::from_html_with_today(html, today())?;

    // Both cards fade on the same schedule; the outer one detaches first and
    // takes the inner one with it. The inner card's own removal must not fail.
    page.advance_time_to(10_000)?;
    assert!(!page.exists("#outer")?);
    assert!(!page.exists("#inner")?);
    page.run_due_timers()?;
    Ok(())
}

#[test]
fn double_scheduled_auto_hide_removes_once_without_error() -> Result<()> {
    let html = r#"
        <div class="page-content">
          <p id="note">temporary</p>
        </div>
        "#;
    let mut page = Page::from_html_with_today(html, today())?;

    // Two overlapping schedules race to detach the same element; the loser
    // finds it already gone and does nothing.
    page.auto_hide("#note", 1000, 100)?;
    page.auto_hide("#note", 1200, 100)?;

    page.advance_time(1100)?;
    assert!(!page.exists("#note")?);
    page.advance_time(500)?;
    assert!(!page.exists("#note")?);
    Ok(())
}

#[test]
fn toast_is_inserted_first_and_removed_within_3500_ms() -> Result<()> {
    let html = r#"
        <div class="page-content">
          <p id="existing">existing content</p>
        </div>
        "#;
    let mut page = Page::from_html_with_today(html, today())?;
    page.show_toast("Saved", ToastKind::Success)?;

    assert_eq!(page.count(".message-card")?, 1);
    page.assert_exists(".success-message")?;
    page.assert_text("i", "check_circle")?;
    page.assert_text("span", "Saved")?;
    let content = page.text_of(".page-content")?;
    assert!(
        content.starts_with("check_circle"),
        "toast should be the first child: {content}"
    );

    page.advance_time(3000)?;
    assert_eq!(page.style_of(".message-card", "opacity")?, "0");
    page.advance_time(500)?;
    assert_eq!(page.count(".message-card")?, 0);

    page.advance_time(1000)?;
    assert_eq!(page.count(".message-card")?, 0);
    Ok(())
}

#[test]
fn toast_kinds_carry_their_icons() -> Result<()> {
    let cases = [
        (ToastKind::Info, "info", "info-message"),
        (ToastKind::Success, "check_circle", "success-message"),
        (ToastKind::Error, "error", "error-message"),
        (ToastKind::Warning, "warning", "warning-message"),
    ];
    for (kind, icon, class) in cases {
        let mut page =
            Page::from_html_with_today(r#"<div class="page-content"></div>"#, today())?;
        page.show_toast("hello", kind)?;
        page.assert_text("i", icon)?;
        assert!(page.exists(&format!(".{class}"))?, "missing .{class}");
    }
    Ok(())
}

#[test]
fn toast_without_container_is_a_no_op() -> Result<()> {
    let mut page = Page::from_html_with_today("<div id='other'></div>", today())?;
    page.show_toast("Saved", ToastKind::Info)?;
    assert_eq!(page.count(".message-card")?, 0);
    Ok(())
}

#[test]
fn confirm_gate_blocks_on_dismissal() -> Result<()> {
    let html = r#"<a href="/todos/5/delete" data-confirm="Delete this todo?">Delete</a>"#;
    let mut page = Page::from_html_with_today(html, today())?;
    page.set_confirm_policy(ConfirmPolicy::DismissAll);
    page.click("a")?;

    assert!(page.navigations().is_empty());
    assert_eq!(
        page.confirm_prompts(),
        &[ConfirmPrompt {
            message: "Delete this todo?".into(),
            accepted: false,
        }]
    );
    Ok(())
}

#[test]
fn confirm_gate_proceeds_on_acceptance() -> Result<()> {
    let html = r#"<a href="/todos/5/delete" data-confirm="Delete this todo?">Delete</a>"#;
    let mut page = Page::from_html_with_today(html, today())?;
    page.set_confirm_policy(ConfirmPolicy::AcceptAll);
    page.click("a")?;

    assert_eq!(page.navigations(), &["/todos/5/delete".to_string()]);
    Ok(())
}

#[test]
fn scripted_confirm_responses_are_consumed_in_order() -> Result<()> {
    let html = r#"<a href="/todos/5/delete" data-confirm="Sure?">Delete</a>"#;
    let mut page = Page::from_html_with_today(html, today())?;
    page.set_confirm_policy(ConfirmPolicy::scripted([false, true]));

    page.click("a")?;
    assert!(page.navigations().is_empty());
    page.click("a")?;
    assert_eq!(page.navigations().len(), 1);

    // A drained queue keeps answering negatively.
    page.click("a")?;
    assert_eq!(page.navigations().len(), 1);
    Ok(())
}

#[test]
fn changing_the_filter_submits_the_search_form() -> Result<()> {
    let mut page = Page::from_html_with_today(SEARCH_PAGE_HTML, today())?;
    page.select_option("select[name=completed]", "true")?;

    assert_eq!(page.submissions().len(), 1);
    let submission = &page.submissions()[0];
    assert_eq!(submission.action, "/todos");
    assert_eq!(submission.method, "get");
    assert!(submission
        .fields
        .contains(&("completed".to_string(), "true".to_string())));
    assert!(submission
        .fields
        .contains(&("search".to_string(), "milk".to_string())));
    Ok(())
}

#[test]
fn clear_search_resets_fields_and_submits() -> Result<()> {
    let mut page = Page::from_html_with_today(SEARCH_PAGE_HTML, today())?;
    page.select_option("select[name=completed]", "true")?;
    page.click("#clearSearch")?;

    page.assert_value("input[name=search]", "")?;
    page.assert_value("select[name=completed]", "")?;
    // One submission from the filter change, one from the clear control.
    assert_eq!(page.submissions().len(), 2);
    let cleared = &page.submissions()[1];
    assert!(cleared
        .fields
        .contains(&("search".to_string(), String::new())));
    assert!(cleared
        .fields
        .contains(&("completed".to_string(), String::new())));
    Ok(())
}

#[test]
fn programmatic_search_submission_bypasses_validation() -> Result<()> {
    let html = r#"
        <form id="searchForm" action="/todos" method="get">
          <input type="text" name="search" required>
          <select name="completed">
            <option value="">All</option>
            <option value="true">Done</option>
          </select>
        </form>
        "#;
    let mut page = Page::from_html_with_today(html, today())?;
    page.select_option("select[name=completed]", "true")?;

    // The required search box is empty, but form.submit() skips validation.
    assert_eq!(page.submissions().len(), 1);
    Ok(())
}

#[test]
fn pagination_link_navigates_to_its_target() -> Result<()> {
    let mut page = Page::from_html_with_url("https://todo.local/todos", SEARCH_PAGE_HTML)?;
    assert_eq!(page.url(), "https://todo.local/todos");

    page.click(".pagination-link")?;
    assert_eq!(page.navigations(), &["/todos?page=2".to_string()]);
    assert_eq!(page.url(), "/todos?page=2");
    Ok(())
}

#[test]
fn date_inputs_get_a_minimum_of_today() -> Result<()> {
    let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
    assert_eq!(page.attr("#dueDate", "min")?, Some("2026-08-07".into()));

    page.set_today(date(2026, 9, 1))?;
    assert_eq!(page.attr("#dueDate", "min")?, Some("2026-09-01".into()));
    Ok(())
}

#[test]
fn resize_events_coalesce_into_one_enhancement_pass() -> Result<()> {
    let mut page = Page::from_html_with_today(TODO_FORM_HTML, today())?;
    page.resize()?;
    page.advance_time(100)?;
    page.resize()?;

    let one_shot = page
        .pending_timers()
        .into_iter()
        .filter(|timer| timer.interval_ms.is_none())
        .collect::<Vec<_>>();
    assert_eq!(one_shot.len(), 1);
    assert_eq!(one_shot[0].due_at, 350);

    page.advance_time(250)?;
    assert_eq!(page.now_ms(), 350);
    let one_shot = page
        .pending_timers()
        .into_iter()
        .filter(|timer| timer.interval_ms.is_none())
        .count();
    assert_eq!(one_shot, 0);
    Ok(())
}

#[test]
fn ctrl_n_navigates_to_the_new_todo_link() -> Result<()> {
    let html = r#"<a href="/todos/new">New todo</a>"#;
    let mut page = Page::from_html_with_today(html, today())?;
    page.press_key_with("n", true, false)?;
    assert_eq!(page.navigations(), &["/todos/new".to_string()]);

    let mut page = Page::from_html_with_today(html, today())?;
    page.press_key_with("n", false, true)?;
    assert_eq!(page.navigations(), &["/todos/new".to_string()]);
    Ok(())
}

#[test]
fn ctrl_n_without_a_new_todo_link_does_nothing() -> Result<()> {
    let mut page = Page::from_html_with_today("<p>empty</p>", today())?;
    page.press_key_with("n", true, false)?;
    assert!(page.navigations().is_empty());
    Ok(())
}

#[test]
fn escape_clears_the_search_field_only_while_focused() -> Result<()> {
    let mut page = Page::from_html_with_today(SEARCH_PAGE_HTML, today())?;

    page.press_key("Escape")?;
    assert_eq!(page.value_of("input[name=search]")?, "milk");

    page.focus("input[name=search]")?;
    page.press_key("Escape")?;
    assert_eq!(page.value_of("input[name=search]")?, "");
    assert!(!page.is_focused("input[name=search]")?);

    page.focus("input[name=search]")?;
    assert!(page.is_focused("input[name=search]")?);
    page.blur("input[name=search]")?;
    assert!(!page.is_focused("input[name=search]")?);
    Ok(())
}

#[test]
fn checkbox_state_flows_into_submissions() -> Result<()> {
    let html = r#"
        <form id="prefs" action="/prefs" method="post">
          <input id="notify" type="checkbox" name="notify" value="yes">
          <button id="savePrefs" type="submit">Save</button>
        </form>
        "#;
    let mut page = Page::from_html_with_today(html, today())?;

    page.click("#savePrefs")?;
    assert!(page.submissions()[0].fields.is_empty());

    page.click("#notify")?;
    page.click("#savePrefs")?;
    assert_eq!(
        page.submissions()[1].fields,
        vec![("notify".to_string(), "yes".to_string())]
    );

    page.set_checked("#notify", false)?;
    page.click("#savePrefs")?;
    assert!(page.submissions()[2].fields.is_empty());
    Ok(())
}

#[test]
fn relative_time_labels() -> Result<()> {
    let page = Page::from_html_with_today("<p></p>", today())?;
    assert_eq!(page.relative_time("2026-08-07"), "today");
    assert_eq!(page.relative_time("2026-08-08"), "tomorrow");
    assert_eq!(page.relative_time("2026-08-09"), "2 days from now");
    assert_eq!(page.relative_time("2026-08-04"), "3 days ago");
    assert_eq!(page.relative_time("2026-08-06"), "1 day ago");
    assert_eq!(page.relative_time("2026-08-09T12:30:00"), "2 days from now");
    assert_eq!(page.relative_time(""), "");
    assert_eq!(page.relative_time("not a date"), "");
    Ok(())
}

#[test]
fn format_date_labels() -> Result<()> {
    let page = Page::from_html_with_today("<p></p>", today())?;
    assert_eq!(page.format_date("2026-08-07"), "today");
    assert_eq!(page.format_date("2026-08-08"), "tomorrow");
    assert_eq!(page.format_date("2026-08-20"), "2026-08-20");
    assert_eq!(page.format_date(""), "");
    Ok(())
}

#[test]
fn time_labels_refresh_on_the_minute_cycle() -> Result<()> {
    let html = r#"<span id="due" data-time="2026-08-08">in a bit</span>"#;
    let mut page = Page::from_html_with_today(html, today())?;

    page.assert_text("#due", "in a bit")?;
    page.advance_time(60_000)?;
    page.assert_text("#due", "tomorrow")?;
    Ok(())
}

#[test]
fn time_labels_refresh_when_the_page_becomes_visible() -> Result<()> {
    let html = r#"<span id="due" data-time="2026-08-08">in a bit</span>"#;
    let mut page = Page::from_html_with_today(html, today())?;

    page.set_hidden(true)?;
    page.assert_text("#due", "in a bit")?;
    page.set_hidden(false)?;
    page.assert_text("#due", "tomorrow")?;
    Ok(())
}

#[test]
fn labels_track_the_clock_across_midnight() -> Result<()> {
    let html = r#"<span id="due" data-time="2026-08-08">in a bit</span>"#;
    let mut page = Page::from_html_with_today(html, today())?;

    page.advance_time(86_400_000)?;
    page.assert_text("#due", "today")?;
    Ok(())
}

#[test]
fn refresh_interval_has_an_explicit_lifecycle() -> Result<()> {
    let html = r#"<span id="due" data-time="2026-08-08">in a bit</span>"#;
    let mut page = Page::from_html_with_today(html, today())?;

    page.stop_relative_time_refresh();
    assert!(page
        .pending_timers()
        .iter()
        .all(|timer| timer.interval_ms.is_none()));
    page.advance_time(120_000)?;
    page.assert_text("#due", "in a bit")?;

    page.start_relative_time_refresh();
    page.advance_time(60_000)?;
    page.assert_text("#due", "tomorrow")?;

    assert!(page.clear_all_timers() >= 1);
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn flush_flags_the_refresh_interval_as_unstopped() -> Result<()> {
    let mut page = Page::from_html_with_today("<p></p>", today())?;
    page.set_timer_step_limit(8)?;
    let err = page.flush().expect_err("interval should trip the step limit");
    match err {
        Error::Runtime(msg) => assert!(msg.contains("unstopped interval"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }

    page.stop_relative_time_refresh();
    page.flush()?;
    Ok(())
}

#[test]
fn toggle_completion_posts_with_the_csrf_token() -> Result<()> {
    let html = r#"
        <head>
          <meta name="_csrf" content="tok-123">
          <meta name="_csrf_header" content="X-CSRF-TOKEN">
        </head>
        <body></body>
        "#;
    let mut page = Page::from_html_with_today(html, today())?;
    page.toggle_todo_completion(7)?;

    assert_eq!(page.submissions().len(), 1);
    let submission = &page.submissions()[0];
    assert_eq!(submission.action, "/todos/7/toggle");
    assert_eq!(submission.method, "post");
    assert_eq!(
        submission.fields,
        vec![("X-CSRF-TOKEN".to_string(), "tok-123".to_string())]
    );
    Ok(())
}

#[test]
fn toggle_completion_degrades_without_csrf_metas() -> Result<()> {
    let mut page = Page::from_html_with_today("<body></body>", today())?;
    page.toggle_todo_completion(7)?;

    assert_eq!(page.submissions().len(), 1);
    assert!(page.submissions()[0].fields.is_empty());
    Ok(())
}

#[test]
fn loading_state_disables_the_control() -> Result<()> {
    let html = r#"<button id="save" type="submit">Save</button>"#;
    let mut page = Page::from_html_with_today(html, today())?;

    page.show_loading("#save")?;
    assert!(page.has_class("#save", "loading")?);
    assert_eq!(page.attr("#save", "disabled")?, Some("disabled".into()));

    // Clicks on a disabled control are swallowed.
    page.click("#save")?;
    assert!(page.submissions().is_empty());

    page.hide_loading("#save")?;
    assert!(!page.has_class("#save", "loading")?);
    assert_eq!(page.attr("#save", "disabled")?, None);
    Ok(())
}

#[test]
fn loading_helpers_ignore_missing_elements() -> Result<()> {
    let mut page = Page::from_html_with_today("<p></p>", today())?;
    page.show_loading("#missing")?;
    page.hide_loading("#missing")?;
    Ok(())
}

#[test]
fn unsupported_selectors_are_typed_errors() -> Result<()> {
    let page = Page::from_html("<p></p>")?;
    let err = page.exists("p:hover").expect_err("pseudo-class");
    match err {
        Error::UnsupportedSelector(selector) => assert_eq!(selector, "p:hover"),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn assertion_failures_carry_a_dom_snippet() -> Result<()> {
    let page = Page::from_html(r#"<p id="msg">hello</p>"#)?;
    let err = page.assert_text("#msg", "goodbye").expect_err("mismatch");
    match err {
        Error::AssertionFailed {
            selector,
            expected,
            actual,
            dom_snippet,
        } => {
            assert_eq!(selector, "#msg");
            assert_eq!(expected, "goodbye");
            assert_eq!(actual, "hello");
            assert!(dom_snippet.contains("<p"), "{dom_snippet}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn trace_logs_capture_events_and_timers() -> Result<()> {
    let mut page = Page::from_html_with_today(SEARCH_PAGE_HTML, today())?;
    page.enable_trace(true);
    page.set_trace_stderr(false);

    page.click(".pagination-link")?;
    page.advance_time(60_000)?;

    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.starts_with("[event]")));
    assert!(logs.iter().any(|line| line.starts_with("[timer]")));
    assert!(logs.iter().any(|line| line.starts_with("[nav]")));

    // Channels can be muted independently, and the buffer is bounded.
    page.set_trace_events(false);
    page.set_trace_timers(false);
    page.click(".pagination-link")?;
    page.advance_time(1000)?;
    let logs = page.take_trace_logs();
    assert!(logs.iter().all(|line| !line.starts_with("[event]")));
    assert!(logs.iter().all(|line| !line.starts_with("[timer]")));

    page.set_trace_events(true);
    page.set_trace_log_limit(2)?;
    page.click(".pagination-link")?;
    assert!(page.take_trace_logs().len() <= 2);
    Ok(())
}
