use crate::data::student::StudentField;
use maud::{Markup, Render, html};

const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-xl font-semibold mt-6 mb-2 text-gray-300" {(s)}
    }
}

fn error_id(field: StudentField) -> String {
    format!("error-{}", field.path())
}

///removes the field's error as soon as it is edited, without waiting for the server
fn clear_error_script(field: StudentField) -> String {
    format!("document.getElementById('{}')?.remove()", error_id(field))
}

pub fn form_element(field: StudentField, error: Option<&str>, input: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(field.path()) class="block text-sm font-bold mb-2" {(field.label())}
            (input)
            @if let Some(error) = error {
                p id=(error_id(field)) class="text-red-400 text-xs italic mt-1" {(error)}
            }
        }
    }
}

pub fn text_field(
    field: StudentField,
    input_type: &'static str,
    value: &str,
    error: Option<&str>,
) -> Markup {
    form_element(
        field,
        error,
        html! {
            input type=(input_type) id=(field.path()) name=(field.path()) value=(value) oninput=(clear_error_script(field)) class=(INPUT_CLASSES);
        },
    )
}

pub fn select_field<'a>(
    field: StudentField,
    options: impl IntoIterator<Item = &'a str>,
    value: &str,
    error: Option<&str>,
) -> Markup {
    form_element(
        field,
        error,
        html! {
            select id=(field.path()) name=(field.path()) oninput=(clear_error_script(field)) class=(INPUT_CLASSES) {
                option value="" selected[value.is_empty()] {"Select " (field.label())}
                @for choice in options {
                    option value=(choice) selected[choice == value] {(choice)}
                }
            }
        },
    )
}

pub fn form_submit_button(text: &'static str) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 disabled:opacity-50 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text)
            }
        }
    }
}

pub fn detail_row(label: &'static str, value: impl Render) -> Markup {
    html! {
        p class="text-gray-200 font-semibold" {
            (label) ": "
            span class="font-medium" {(value)}
        }
    }
}
