#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use fixtures::{
    FailingDocumentStore, TEST_PASSWORD, get_test_connection, get_test_store, insert_test_user,
};
pub(crate) use form::{
    assert_form_message, assert_hx_attribute, assert_required_input, assert_submit_button,
    must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_hx_redirect, assert_status};
