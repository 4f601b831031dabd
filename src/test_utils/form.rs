use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

/// Assert that `element` sends its request to `endpoint` via the htmx `attribute`, e.g. "hx-post".
#[track_caller]
pub(crate) fn assert_hx_attribute(element: &ElementRef<'_>, attribute: &str, endpoint: &str) {
    let got = element.value().attr(attribute);

    assert_eq!(
        got,
        Some(endpoint),
        "want {attribute}=\"{endpoint}\", got {got:?}"
    );
}

#[track_caller]
pub(crate) fn assert_required_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let selector = Selector::parse(&format!("input[name='{name}']")).unwrap();
    let input = form
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""));

    let got_type = input.value().attr("type").unwrap_or_default();
    assert_eq!(got_type, type_, "want input {name} with type \"{type_}\", got {got_type:?}");
    assert!(
        input.value().attr("required").is_some(),
        "want input with name {name} to have the required attribute but got none"
    );
}

#[track_caller]
pub(crate) fn assert_submit_button(form: &ElementRef<'_>, text: &str) {
    let button = form
        .select(&Selector::parse("button[type='submit']").unwrap())
        .next()
        .expect("No submit button found");

    assert_eq!(button.text().collect::<String>().trim(), text);
}

/// Assert the form shows `want` in its alert (error) or status (success) message.
#[track_caller]
pub(crate) fn assert_form_message(form: &ElementRef<'_>, want: &str) {
    let selector = Selector::parse("p[role='alert'], p[role='status']").unwrap();
    let message = form
        .select(&selector)
        .next()
        .expect("No form message found")
        .text()
        .collect::<String>();

    assert_eq!(message.trim(), want);
}
