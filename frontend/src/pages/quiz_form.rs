//! 创建与编辑测验共用的表单
//!
//! - `QuizFormState`: 表单数据的持有、加载与到请求对象的转换
//! - `QuizForm`: 标题、描述与题目编辑器

use leptos::prelude::*;
use quizhub_shared::{QuestionDraft, QuizDraft};

use crate::components::icons::{Plus, Trash};
use crate::components::ui::checkbox::Checkbox;
use crate::components::ui::form::{
    FormDescription, FormField, FormInput, FormLabel, FormMessage, FormTextarea,
};
use crate::error::FormError;
use crate::validation::{
    FIELD_DESCRIPTION, FIELD_QUESTIONS, FIELD_TITLE, FieldErrors, MAX_DESCRIPTION_LEN,
    MAX_TITLE_LEN, validate_quiz_draft,
};

/// 题目编辑行
///
/// `key` 在表单内唯一，用于列表渲染时保持行身份。
#[derive(Clone, Copy)]
pub struct QuestionRow {
    pub key: usize,
    pub text: RwSignal<String>,
    pub correct_answer: RwSignal<bool>,
}

/// 表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct QuizFormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub questions: RwSignal<Vec<QuestionRow>>,
    next_key: RwSignal<usize>,
}

impl QuizFormState {
    /// 新表单：一道空题
    pub fn new() -> Self {
        let state = Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            questions: RwSignal::new(Vec::new()),
            next_key: RwSignal::new(0),
        };
        state.add_question();
        state
    }

    fn row(&self, draft: QuestionDraft) -> QuestionRow {
        let key = self.next_key.get_untracked();
        self.next_key.set(key + 1);
        QuestionRow {
            key,
            text: RwSignal::new(draft.text),
            correct_answer: RwSignal::new(draft.correct_answer),
        }
    }

    pub fn add_question(&self) {
        let row = self.row(QuestionDraft::default());
        self.questions.update(|rows| rows.push(row));
    }

    pub fn remove_question(&self, key: usize) {
        self.questions.update(|rows| rows.retain(|row| row.key != key));
    }

    /// 用已有测验填充表单（编辑时）
    pub fn load(&self, draft: QuizDraft) {
        self.title.set(draft.title);
        self.description.set(draft.description);
        let rows: Vec<QuestionRow> = draft.questions.into_iter().map(|q| self.row(q)).collect();
        self.questions.set(rows);
    }

    /// 将表单状态转换为请求对象
    pub fn to_draft(&self) -> QuizDraft {
        QuizDraft {
            title: self.title.get_untracked().trim().to_string(),
            description: self.description.get_untracked().trim().to_string(),
            questions: self.questions.with_untracked(|rows| {
                rows.iter()
                    .map(|row| QuestionDraft {
                        text: row.text.get_untracked().trim().to_string(),
                        correct_answer: row.correct_answer.get_untracked(),
                    })
                    .collect()
            }),
        }
    }
}

impl Default for QuizFormState {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn QuizForm(
    state: QuizFormState,
    /// 提交按钮文字
    submit_label: &'static str,
    /// 通过校验后回调
    on_submit: Callback<QuizDraft>,
    #[prop(into)] is_submitting: Signal<bool>,
) -> impl IntoView {
    let field_errors = RwSignal::new(FieldErrors::new());
    let errors_for = move |field: &'static str| -> Signal<Vec<FormError>> {
        Signal::derive(move || field_errors.with(|e| e.get(field)))
    };

    let handle_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = state.to_draft();
        let errors = validate_quiz_draft(&draft);
        let is_valid = errors.is_empty();
        field_errors.set(errors);
        if is_valid {
            on_submit.run(draft);
        }
    };

    view! {
        <form class="card bg-base-100 shadow-xl" on:submit=handle_submit novalidate>
            <div class="card-body space-y-2">
                <FormField name="title" errors=errors_for(FIELD_TITLE)>
                    <FormLabel>"Title"</FormLabel>
                    <FormInput value=state.title placeholder="e.g. Rust trivia" />
                    <FormDescription>{format!("Up to {} characters.", MAX_TITLE_LEN)}</FormDescription>
                    <FormMessage />
                </FormField>

                <FormField name="description" errors=errors_for(FIELD_DESCRIPTION)>
                    <FormLabel>"Description"</FormLabel>
                    <FormTextarea value=state.description placeholder="What is this quiz about?" />
                    <FormDescription>{format!("Optional, up to {} characters.", MAX_DESCRIPTION_LEN)}</FormDescription>
                    <FormMessage />
                </FormField>

                <FormField name="questions" errors=errors_for(FIELD_QUESTIONS)>
                    <div class="flex items-center justify-between mt-4">
                        <FormLabel>"Questions"</FormLabel>
                        <button type="button" class="btn btn-sm btn-outline gap-1" on:click=move |_| state.add_question()>
                            <Plus attr:class="h-4 w-4" />
                            "Add question"
                        </button>
                    </div>
                    <FormMessage />
                </FormField>

                <div class="space-y-3">
                    <For
                        each=move || state.questions.get().into_iter().enumerate()
                        key=|(index, row)| (*index, row.key)
                        let:item
                    >
                        <QuestionEditor index=item.0 row=item.1 state=state />
                    </For>
                </div>

                <div class="card-actions justify-end mt-4">
                    <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                        } else {
                            submit_label.into_any()
                        }}
                    </button>
                </div>
            </div>
        </form>
    }
}

#[component]
fn QuestionEditor(index: usize, row: QuestionRow, state: QuizFormState) -> impl IntoView {
    let input_id = format!("question-{}", row.key);
    let checkbox_id = format!("question-{}-answer", row.key);

    view! {
        <div class="flex flex-col md:flex-row md:items-center gap-3 p-3 rounded-box bg-base-200">
            <label class="font-semibold w-8" for=input_id.clone()>{format!("{}.", index + 1)}</label>
            <input
                id=input_id
                type="text"
                class="input input-bordered input-sm flex-1"
                placeholder="Statement to judge true or false"
                prop:value=move || row.text.get()
                on:input=move |ev| row.text.set(event_target_value(&ev))
            />
            <Checkbox
                id=checkbox_id
                checked=row.correct_answer
                on_toggle=Callback::new(move |value| row.correct_answer.set(value))
                label="Correct answer is true"
            />
            <button
                type="button"
                class="btn btn-sm btn-ghost text-error"
                title="Remove question"
                on:click=move |_| state.remove_question(row.key)
            >
                <Trash attr:class="h-4 w-4" />
            </button>
        </div>
    }
}
