use crate::{
    client::dashboard::DashboardView,
    config::date_locale::DateLocaleConfig,
    data::{
        IdForm,
        search::StudentFilter,
        student::{Course, Student},
        validation::age_in_years,
    },
    error::{HtmlError, HtmlResult, MalformedQuerySnafu, RegistrarError},
    maud_conveniences::{detail_row, title},
    state::RegistrarState,
};
use axum::extract::{Query, State, rejection::QueryRejection};
use jiff::Timestamp;
use maud::{Markup, html};
use serde::Deserialize;
use snafu::ResultExt;
use uuid::Uuid;

const FETCH_FAILED: &str = "Failed to fetch students";
const DELETE_FAILED: &str = "Failed to delete student";
const LOAD_FAILED: &str = "Failed to load student";

const CARD: &str = "rounded-lg shadow-md p-4 bg-gray-700 hover:bg-gray-600";
const SELECTED_CARD: &str = "rounded-lg shadow-md p-4 bg-gray-700 hover:bg-gray-600 ring-2 ring-blue-400";

pub async fn get_dashboard(State(state): State<RegistrarState>) -> Markup {
    state.render(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-6xl w-full flex flex-col space-y-4" {
            div class="flex flex-row items-center justify-between" {
                (title("Student Dashboard"))
                button class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-get="/internal/dashboard/students" hx-include="#dashboard_filters, #selected_id" hx-target="#all_students" {
                    "Refresh"
                }
            }
            div id="dashboard_error" {}
            form id="dashboard_filters" class="flex flex-row space-x-4" onsubmit="return false" {
                input type="search" name="search" placeholder="Search by name, email or phone" hx-get="/internal/dashboard/students" hx-include="#dashboard_filters, #selected_id" hx-target="#all_students" hx-trigger="input changed delay:500ms, keyup[key=='Enter']" class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight bg-gray-700 border-gray-600";
                select name="course" hx-get="/internal/dashboard/students" hx-include="#dashboard_filters, #selected_id" hx-target="#all_students" hx-trigger="change" class="shadow border rounded py-2 px-3 bg-gray-700 border-gray-600" {
                    option value="" {"All Courses"}
                    @for course in Course::ALL {
                        option value=(course.as_str()) {(course.as_str())}
                    }
                }
            }
            div class="container flex flex-row justify-center space-x-4" {
                div id="all_students" class="w-1/2" hx-get="/internal/dashboard/students" hx-trigger="load" {}
                div id="in_focus" class="w-1/2" {}
            }
        }
    })
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    search: Option<String>,
    course: Option<String>,
    selected: Option<String>,
}

impl DashboardQuery {
    fn filter(&self) -> StudentFilter {
        StudentFilter::new(self.search.clone(), self.course.clone())
    }

    ///the open card travels as a hidden input, which is empty when nothing is open
    fn selected(&self) -> Option<Uuid> {
        self.selected
            .as_deref()
            .and_then(|raw| Uuid::try_parse(raw).ok())
    }
}

pub async fn internal_get_students(
    State(state): State<RegistrarState>,
    Query(query): Query<DashboardQuery>,
) -> HtmlResult<Markup> {
    let view = DashboardView::fetch(state.store(), query.filter())
        .await
        .map_err(|e| HtmlError::new(FETCH_FAILED, e))?
        .with_selected(query.selected());

    Ok(student_grid(&view))
}

pub async fn internal_get_student(
    State(state): State<RegistrarState>,
    query: Result<Query<IdForm>, QueryRejection>,
) -> HtmlResult<Markup> {
    let Query(IdForm { id }) = query
        .context(MalformedQuerySnafu)
        .map_err(|e| HtmlError::new(LOAD_FAILED, e))?;
    let Some(student) = state
        .store()
        .get_by_id(id)
        .await
        .map_err(|e| HtmlError::new(LOAD_FAILED, e))?
    else {
        return Err(HtmlError::new(
            LOAD_FAILED,
            RegistrarError::MissingStudent { id },
        ));
    };

    student_detail(&student, &state.config().date_locale())
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    id: Uuid,
    #[serde(flatten)]
    dashboard: DashboardQuery,
}

pub async fn internal_delete_student(
    State(state): State<RegistrarState>,
    Query(DeleteQuery { id, dashboard }): Query<DeleteQuery>,
) -> HtmlResult<Markup> {
    let deleted = state
        .store()
        .delete_by_id(id)
        .await
        .map_err(|e| HtmlError::new(DELETE_FAILED, e))?;
    if !deleted {
        return Err(HtmlError::new(
            DELETE_FAILED,
            RegistrarError::MissingStudent { id },
        ));
    }
    info!(%id, "Deleted student from the dashboard");

    let mut view = DashboardView::fetch(state.store(), dashboard.filter())
        .await
        .map_err(|e| HtmlError::new(FETCH_FAILED, e))?
        .with_selected(dashboard.selected());
    let was_selected = view.deleted(id);

    Ok(html! {
        div hx-swap-oob="innerHTML:#all_students" {
            (student_grid(&view))
        }
        @if was_selected {
            div id="in_focus" class="w-1/2" hx-swap-oob="true" {}
        }
    })
}

fn student_grid(view: &DashboardView) -> Markup {
    let shown = view.visible().count();

    html! {
        div class="container mx-auto flex flex-col space-y-4" {
            div class="flex flex-row justify-between items-baseline" {
                h2 class="text-xl font-semibold" {"Registered Students (" (shown) ")"}
                p class="text-lg text-gray-300" {"Total Students: " (view.total())}
            }
            @if shown == 0 {
                p class="text-gray-400" {"No students found"}
            }
            div class="grid grid-cols-1 sm:grid-cols-2 gap-4" {
                @for student in view.visible() {
                    div class=(if view.is_selected(student.id) { SELECTED_CARD } else { CARD }) {
                        a hx-get="/internal/dashboard/student" hx-target="#in_focus" hx-vals={"{\"id\": \"" (student.id) "\"}"} class="block cursor-pointer" {
                            p class="font-semibold" {(student.full_name())}
                            p class="text-sm text-gray-300" {(student.email)}
                            p class="text-sm text-gray-300" {(student.course.as_str()) " - Year " (student.year)}
                        }
                        button class="mt-2 bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" hx-delete="/internal/dashboard/student" hx-vals={"{\"id\": \"" (student.id) "\"}"} hx-include="#dashboard_filters, #selected_id" hx-confirm="Are you sure you want to delete this student?" hx-target="#dashboard_error" {
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}

fn student_detail(student: &Student, date_locale: &DateLocaleConfig) -> HtmlResult<Markup> {
    let date_of_birth = date_locale.short_date(student.date_of_birth)?;
    let registered = date_locale.long_timestamp(student.created_at)?;
    let age = age_in_years(student.date_of_birth, Timestamp::now())
        .map(|age| format!("{:.0}", age.floor()))
        .unwrap_or_default();
    let address = &student.address;

    Ok(html! {
        div class="container mx-auto" {
            input type="hidden" id="selected_id" name="selected" value=(student.id);
            (title(student.full_name()))

            div class="rounded-lg shadow-md overflow-hidden bg-gray-700 max-w-md mx-auto" {
                div class="p-4 space-y-1" {
                    (detail_row("Email", &student.email))
                    (detail_row("Phone", &student.phone))
                    (detail_row("Date of Birth", date_of_birth))
                    (detail_row("Age", age))
                    (detail_row("Gender", student.gender.as_str()))
                    (detail_row("Course", student.course.as_str()))
                    (detail_row("Year", student.year))
                    (detail_row("Address", format!("{}, {}, {} - {}", address.street, address.city, address.state, address.zip_code)))
                    (detail_row("Guardian", &student.guardian_name))
                    (detail_row("Guardian Phone", &student.guardian_phone))
                    (detail_row("Registered", registered))

                    div class="flex flex-row space-x-2 pt-4" {
                        button class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" hx-delete="/internal/dashboard/student" hx-vals={"{\"id\": \"" (student.id) "\"}"} hx-include="#dashboard_filters, #selected_id" hx-confirm="Are you sure you want to delete this student?" hx-target="#dashboard_error" {
                            "Delete student"
                        }
                        button class="bg-gray-600 hover:bg-gray-800 font-bold py-2 px-4 rounded" onclick="document.getElementById('in_focus').innerHTML = ''" {
                            "Close"
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests;
