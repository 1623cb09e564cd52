use advent_core::VerseEntry;
use yew::prelude::*;

use crate::utils::Modal;

#[derive(Properties, PartialEq)]
pub(crate) struct VerseModalProps {
    pub verse: Option<VerseEntry>,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn VerseModal(props: &VerseModalProps) -> Html {
    let Some(verse) = props.verse.clone() else {
        return html! {};
    };
    let on_close = props.on_close.clone();
    let onclick = Callback::from(move |_: MouseEvent| on_close.emit(()));

    html! {
        <Modal>
            <dialog class="verse" open={true}>
                <article>
                    <header>
                        <small>{format!("Day {}", verse.day)}</small>
                        <h2>{verse.reference}</h2>
                    </header>
                    <p>{verse.text}</p>
                    <footer>
                        <button {onclick}>{"닫기"}</button>
                    </footer>
                </article>
            </dialog>
        </Modal>
    }
}
