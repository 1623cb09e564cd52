use advent_core::Identity;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

const TEMPLE_NAMES: &[&str] = &[
    "강남", "경주", "과천", "광명", "광주", "구리", "김포", "남양", "당진", "대구", "대전", "동탄",
    "부곡", "부천", "부평", "산서", "서산", "세종", "수원", "시화", "시흥", "아산", "안산", "안양",
    "안중", "양주", "영등포", "영종도", "영통", "온양", "용인", "원주", "율전", "인제", "인천",
    "일산", "장유", "전원", "전주평화", "전주효자", "진위", "진주", "천안", "충주", "판교", "평택",
    "포일",
];

const MAX_GENERATION: u32 = 37;

/// Submitted value for a temple option.
fn temple_value(name: &str) -> String {
    format!("{}성전", name)
}

#[derive(Properties, PartialEq)]
pub(crate) struct IdentityFormProps {
    pub on_submit: Callback<Identity>,
}

#[function_component]
pub(crate) fn IdentityForm(props: &IdentityFormProps) -> Html {
    let temple = use_state(String::new);
    let generation = use_state(String::new);
    let name = use_state(String::new);

    let identity = Identity::new(&temple, &generation, &name);
    let is_valid = identity.is_ok();

    let onsubmit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match &identity {
                Ok(identity) => on_submit.emit(identity.clone()),
                Err(err) => log::debug!("form not ready: {}", err),
            }
        })
    };

    let on_temple = {
        let temple = temple.clone();
        Callback::from(move |e: Event| {
            temple.set(e.target_unchecked_into::<HtmlSelectElement>().value());
        })
    };

    let on_generation = {
        let generation = generation.clone();
        Callback::from(move |e: Event| {
            generation.set(e.target_unchecked_into::<HtmlSelectElement>().value());
        })
    };

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            name.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    html! {
        <dialog class="identity" open={true}>
            <article>
                <header>
                    <h2>{"독수리 의원에 오신 것을 환영합니다"}</h2>
                    <p>{"말씀 처방을 위해 정보를 입력해주세요"}</p>
                </header>
                <form {onsubmit}>
                    <label>
                        {"성전"}
                        <select onchange={on_temple}>
                            <option value="" selected={temple.is_empty()} disabled={true}>{"성전을 선택하세요"}</option>
                            {
                                for TEMPLE_NAMES.iter().map(|&temple_name| {
                                    let value = temple_value(temple_name);
                                    let selected = *temple == value;
                                    html! {
                                        <option {value} {selected}>{format!("🏛️ {}성전", temple_name)}</option>
                                    }
                                })
                            }
                        </select>
                    </label>
                    <label>
                        {"기수"}
                        <select onchange={on_generation}>
                            <option value="" selected={generation.is_empty()} disabled={true}>{"기수를 선택하세요"}</option>
                            {
                                for (1..=MAX_GENERATION).map(|n| {
                                    let value = n.to_string();
                                    let selected = *generation == value;
                                    html! {
                                        <option {value} {selected}>{format!("{}기", n)}</option>
                                    }
                                })
                            }
                        </select>
                    </label>
                    <label>
                        {"이름"}
                        <input type="text" placeholder="이름을 입력하세요" value={(*name).clone()} oninput={on_name}/>
                    </label>
                    <button type="submit" disabled={!is_valid}>{"시작하기 ✨"}</button>
                </form>
            </article>
        </dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_temple_option_is_a_valid_identity_temple() {
        assert_eq!(TEMPLE_NAMES.len(), 47);
        for name in TEMPLE_NAMES {
            let identity = Identity::new(&temple_value(name), "1", "홍길동").unwrap();
            assert!(identity.temple.ends_with("성전"));
        }
    }

    #[test]
    fn every_generation_option_parses() {
        for n in 1..=MAX_GENERATION {
            let identity = Identity::new("강남성전", &n.to_string(), "홍길동").unwrap();
            assert_eq!(identity.generation.get(), n);
        }
    }
}
