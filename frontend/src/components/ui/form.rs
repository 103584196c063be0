//! 表单字段脚手架
//!
//! `FormField` 为一个字段生成一组元素 id，并通过 Context 提供给
//! `FormLabel` / `FormInput` / `FormDescription` / `FormMessage`，
//! 从而把标签、说明与错误消息和输入框关联起来
//! （`for`、`aria-describedby`、`aria-invalid`）。

use leptos::context::Provider;
use leptos::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{FormError, first_message};

static NEXT_FIELD: AtomicUsize = AtomicUsize::new(1);

/// 一个字段内各元素的 id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIds {
    pub input: String,
    pub description: String,
    pub message: String,
}

impl FieldIds {
    pub fn from_base(base: &str) -> Self {
        Self {
            input: format!("{}-input", base),
            description: format!("{}-description", base),
            message: format!("{}-message", base),
        }
    }

    /// 生成页面内唯一的一组 id
    pub fn generate(name: &str) -> Self {
        let n = NEXT_FIELD.fetch_add(1, Ordering::Relaxed);
        Self::from_base(&format!("{}-{}", name, n))
    }

    /// 输入框的 `aria-describedby`，只指向实际渲染出来的说明与错误消息
    pub fn described_by(&self, has_description: bool, has_error: bool) -> Option<String> {
        let ids: Vec<&str> = [
            has_description.then_some(self.description.as_str()),
            has_error.then_some(self.message.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect();
        (!ids.is_empty()).then(|| ids.join(" "))
    }
}

#[derive(Clone)]
struct FieldContext {
    ids: FieldIds,
    errors: Signal<Vec<FormError>>,
    /// 由 `FormDescription` 挂载时登记
    has_description: RwSignal<bool>,
}

impl FieldContext {
    fn has_error(&self) -> bool {
        self.errors.with(|errors| first_message(errors).is_some())
    }

    fn described_by(&self) -> Option<String> {
        self.ids.described_by(self.has_description.get(), self.has_error())
    }
}

fn use_field() -> FieldContext {
    use_context::<FieldContext>().expect("form controls must be placed inside a FormField")
}

#[component]
pub fn FormField(
    /// 用作 id 前缀
    #[prop(optional, into)]
    name: Option<String>,
    #[prop(into, default = Signal::stored(Vec::new()))] errors: Signal<Vec<FormError>>,
    children: Children,
) -> impl IntoView {
    let ids = FieldIds::generate(name.as_deref().unwrap_or("field"));
    let context = FieldContext {
        ids,
        errors,
        has_description: RwSignal::new(false),
    };

    view! {
        <Provider value=context>
            <div class="form-control w-full">{children()}</div>
        </Provider>
    }
}

#[component]
pub fn FormLabel(children: Children) -> impl IntoView {
    let field = use_field();
    let errors = field.clone();

    view! {
        <label class="label" for=field.ids.input>
            <span class=move || {
                if errors.has_error() { "label-text text-error" } else { "label-text" }
            }>{children()}</span>
        </label>
    }
}

#[component]
pub fn FormInput(
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional, into)] placeholder: String,
    #[prop(optional)] autocomplete: Option<&'static str>,
    #[prop(into, default = Signal::stored(false))] disabled: Signal<bool>,
) -> impl IntoView {
    let field = use_field();
    let ids = field.ids.clone();
    let invalid = field.clone();
    let aria_invalid = field.clone();
    let described = field;

    view! {
        <input
            id=ids.input
            type=input_type
            placeholder=placeholder
            autocomplete=autocomplete
            class=move || {
                if invalid.has_error() { "input input-bordered input-error w-full" } else { "input input-bordered w-full" }
            }
            aria-invalid=move || if aria_invalid.has_error() { "true" } else { "false" }
            aria-describedby=move || described.described_by()
            prop:value=move || value.get()
            on:input=move |ev| value.set(event_target_value(&ev))
            disabled=move || disabled.get()
        />
    }
}

/// 多行输入
#[component]
pub fn FormTextarea(
    value: RwSignal<String>,
    #[prop(optional, into)] placeholder: String,
    #[prop(default = 3)] rows: u32,
) -> impl IntoView {
    let field = use_field();
    let ids = field.ids.clone();
    let aria_invalid = field.clone();
    let described = field;

    view! {
        <textarea
            id=ids.input
            rows=rows
            placeholder=placeholder
            class="textarea textarea-bordered w-full"
            aria-invalid=move || if aria_invalid.has_error() { "true" } else { "false" }
            aria-describedby=move || described.described_by()
            prop:value=move || value.get()
            on:input=move |ev| value.set(event_target_value(&ev))
        ></textarea>
    }
}

#[component]
pub fn FormDescription(children: Children) -> impl IntoView {
    let field = use_field();
    let has_description = field.has_description;
    has_description.set(true);
    on_cleanup(move || {
        has_description.try_set(false);
    });

    view! {
        <p id=field.ids.description class="text-xs text-base-content/60 mt-1">
            {children()}
        </p>
    }
}

/// 字段错误消息；没有错误时不渲染
#[component]
pub fn FormMessage() -> impl IntoView {
    let field = use_field();
    let id = field.ids.message.clone();
    let errors = field.errors;

    move || {
        errors.with(|errors| first_message(errors)).map(|message| {
            view! {
                <p id=id.clone() role="alert" class="text-error text-sm mt-1">
                    {message}
                </p>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_related() {
        let a = FieldIds::generate("title");
        let b = FieldIds::generate("title");
        assert_ne!(a.input, b.input);
        assert!(a.input.starts_with("title-"));
        assert_eq!(a.input.trim_end_matches("-input"), a.message.trim_end_matches("-message"));
    }

    #[test]
    fn test_described_by_only_references_rendered_parts() {
        let ids = FieldIds::from_base("email");
        assert_eq!(ids.described_by(false, false), None);
        assert_eq!(ids.described_by(false, true).as_deref(), Some("email-message"));
        assert_eq!(ids.described_by(true, false).as_deref(), Some("email-description"));
        assert_eq!(
            ids.described_by(true, true).as_deref(),
            Some("email-description email-message")
        );
    }

    fn render_field(with_description: bool) -> String {
        Owner::new().with(|| {
            let value = RwSignal::new(String::new());
            if with_description {
                view! {
                    <FormField name="email">
                        <FormInput value=value />
                        <FormDescription>"We never share it."</FormDescription>
                    </FormField>
                }
                .to_html()
            } else {
                view! {
                    <FormField name="email">
                        <FormInput value=value />
                    </FormField>
                }
                .to_html()
            }
        })
    }

    #[test]
    fn test_input_without_description_has_no_dangling_reference() {
        let html = render_field(false);
        assert!(!html.contains("aria-describedby"));
        assert!(!html.contains("-description"));
    }

    #[test]
    fn test_input_points_at_rendered_description() {
        let html = render_field(true);
        assert!(html.contains("aria-describedby=\"email-"));
        assert_eq!(html.matches("-description\"").count(), 2);
    }
}
