use leptos::prelude::*;

/// 分隔线；传入 `text` 时文字显示在线的中间
#[component]
pub fn Divider(#[prop(optional, into)] text: Option<String>) -> impl IntoView {
    view! { <div class="divider text-sm text-base-content/60">{text}</div> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_optional() {
        let (with_text, plain) = Owner::new().with(|| {
            (
                view! { <Divider text="Section A" /> }.to_html(),
                view! { <Divider /> }.to_html(),
            )
        });
        assert_eq!(with_text.matches("Section A").count(), 1);
        assert!(!plain.contains("Section"));
        assert!(plain.contains("divider"));
    }
}
