use crate::{
    config::RuntimeConfiguration,
    data::{
        student::{Student, StudentDraft},
        validation,
    },
    error::{RegistrarError, RegistrarResult},
    store::{self, StudentStore},
};
use jiff::Timestamp;
use maud::{DOCTYPE, Markup, html};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct RegistrarState {
    store: Arc<dyn StudentStore>,
    config: RuntimeConfiguration,
}

impl RegistrarState {
    pub async fn new(config: RuntimeConfiguration) -> RegistrarResult<Self> {
        let store = store::open(&config.store_config()).await?;
        Ok(Self::with_store(store, config))
    }

    pub fn with_store(store: Arc<dyn StudentStore>, config: RuntimeConfiguration) -> Self {
        Self { store, config }
    }

    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    //alerts come back with 4xx/5xx statuses and still need swapping in
                    meta name="htmx-config" content="{\"responseHandling\": [{\"code\": \"204\", \"swap\": false}, {\"code\": \"...\", \"swap\": true}]}" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Student Registration" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    nav class="w-full bg-gray-800 px-6 py-3 mb-8 flex gap-6" {
                        a href="/register" class="hover:text-blue-300" {"Register"}
                        a href="/dashboard" class="hover:text-blue-300" {"Dashboard"}
                    }
                    (markup)
                }
            }
        }
    }

    pub fn store(&self) -> &dyn StudentStore {
        self.store.as_ref()
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    /// Validates `draft` and, if it passes, hands the normalised record to the store.
    pub async fn register(&self, draft: &StudentDraft) -> RegistrarResult<Student> {
        let new_student = validation::validate(draft, Timestamp::now())
            .map_err(|errors| RegistrarError::Validation { errors })?;

        let student = self.store.create(new_student).await?;
        info!(id = %student.id, course = %student.course, "Registered student");

        Ok(student)
    }

    pub async fn sensible_shutdown(&self) {
        info!("Closing student store");
        self.store.close().await;
    }
}
