use crate::{
    client::registration_form::{FLASH_DURATION, RegistrationForm},
    data::student::{Course, Gender, StudentField},
    error::alert,
    maud_conveniences::{form_submit_button, select_field, subtitle, text_field, title},
    state::RegistrarState,
};
use axum::{Form, extract::State};
use jiff::Timestamp;
use maud::{Markup, html};

const YEARS: [&str; 4] = ["1", "2", "3", "4"];

pub async fn get_register(State(state): State<RegistrarState>) -> Markup {
    state.render(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-3xl w-full flex flex-col space-y-4" {
            (title("Student Registration"))
            (render_form(&RegistrationForm::default()))
        }
    })
}

pub async fn internal_post_register(
    State(state): State<RegistrarState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Markup {
    let mut form = RegistrationForm::from_fields(
        fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );

    form.submit(Timestamp::now(), |draft| async move {
        state.register(&draft).await
    })
    .await;
    debug!(phase = ?form.phase(), errors = form.errors().len(), "Registration form submitted");

    render_form(&form)
}

///swapped in over the success banner once it has been up long enough
pub async fn internal_get_dismiss() -> Markup {
    html! {}
}

fn field(form: &RegistrationForm, field: StudentField, input_type: &'static str) -> Markup {
    text_field(field, input_type, &form.value(field), form.error(field))
}

fn choice<'a>(
    form: &RegistrationForm,
    field: StudentField,
    options: impl IntoIterator<Item = &'a str>,
) -> Markup {
    select_field(field, options, &form.value(field), form.error(field))
}

fn render_form(form: &RegistrationForm) -> Markup {
    html! {
        form id="registration_form" hx-post="/internal/register" hx-target="this" hx-swap="outerHTML" hx-disabled-elt="find button" novalidate class="p-4" {
            @if let Some(message) = form.success_message() {
                div id="registration_flash" hx-get="/internal/register/dismiss" hx-trigger={"load delay:" (FLASH_DURATION.as_secs()) "s"} hx-swap="outerHTML" class="bg-green-100 border border-green-400 text-green-700 px-4 py-3 rounded mb-4" role="status" {
                    (message)
                }
            }
            @if let Some(failure) = form.failure() {
                (alert(failure))
            }

            (subtitle("Personal Information"))
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (field(form, StudentField::FirstName, "text"))
                (field(form, StudentField::LastName, "text"))
                (field(form, StudentField::Email, "email"))
                (field(form, StudentField::Phone, "tel"))
                (field(form, StudentField::DateOfBirth, "date"))
                (choice(form, StudentField::Gender, Gender::ALL.map(Gender::as_str)))
            }

            (subtitle("Academic Information"))
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (choice(form, StudentField::Course, Course::ALL.map(Course::as_str)))
                (choice(form, StudentField::Year, YEARS))
            }

            (subtitle("Address"))
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (field(form, StudentField::Street, "text"))
                (field(form, StudentField::City, "text"))
                (field(form, StudentField::State, "text"))
                (field(form, StudentField::ZipCode, "text"))
            }

            (subtitle("Guardian Information"))
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (field(form, StudentField::GuardianName, "text"))
                (field(form, StudentField::GuardianPhone, "tel"))
            }

            (form_submit_button("Register Student"))
        }
    }
}
