use leptos::prelude::*;

/// 复选框，可带标签
#[component]
pub fn Checkbox(
    /// 当前是否勾选
    #[prop(into)]
    checked: Signal<bool>,
    /// 勾选状态变化时回调新值
    #[prop(into)]
    on_toggle: Callback<bool>,
    /// 标签文本，缺省时只渲染复选框本身
    #[prop(optional, into)]
    label: Option<String>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(into, default = Signal::stored(false))] disabled: Signal<bool>,
) -> impl IntoView {
    let input = view! {
        <input
            type="checkbox"
            class="checkbox checkbox-primary checkbox-sm"
            id=id
            prop:checked=move || checked.get()
            disabled=move || disabled.get()
            on:change=move |ev| on_toggle.run(event_target_checked(&ev))
        />
    };

    match label {
        Some(text) => view! {
            <label class="label cursor-pointer justify-start gap-3">
                {input}
                <span class="label-text">{text}</span>
            </label>
        }
        .into_any(),
        None => input.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(label: Option<&str>) -> String {
        Owner::new().with(|| {
            let on_toggle = Callback::new(|_: bool| {});
            match label {
                Some(text) => view! {
                    <Checkbox checked=Signal::stored(true) on_toggle=on_toggle label=text />
                }
                .to_html(),
                None => view! { <Checkbox checked=Signal::stored(false) on_toggle=on_toggle /> }
                    .to_html(),
            }
        })
    }

    #[test]
    fn test_label_rendered_once_when_present() {
        let html = render(Some("Correct answer is true"));
        assert_eq!(html.matches("Correct answer is true").count(), 1);
        assert_eq!(html.matches("<label").count(), 1);
        assert_eq!(html.matches("type=\"checkbox\"").count(), 1);
    }

    #[test]
    fn test_no_label_without_text() {
        let html = render(None);
        assert!(!html.contains("<label"));
        assert_eq!(html.matches("type=\"checkbox\"").count(), 1);
    }
}
