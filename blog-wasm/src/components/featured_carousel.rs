use blog_client::FeaturedPost;
use blog_client::carousel::{Carousel, DEFAULT_SLIDE_INTERVAL_MS};
use gloo_timers::callback::{Interval, Timeout};
use leptos::prelude::*;
use leptos_router::components::A;

use crate::routes;

/// Пауза перед возвратом анимации после прыжка с клона: браузер должен
/// успеть отрисовать ленту без перехода.
const RESUME_DELAY_MS: u32 = 30;

#[component]
pub(crate) fn FeaturedCarousel(
    category: String,
    posts: Vec<FeaturedPost>,
    #[prop(optional)] auto_slide: bool,
) -> impl IntoView {
    let carousel = RwSignal::new(Carousel::new(posts));
    let (track, total_pages, show_nav, show_dots) = carousel.with_untracked(|c| {
        (
            c.track(),
            c.total_pages(),
            c.show_nav_buttons(auto_slide),
            c.show_dots(),
        )
    });

    let auto_advance = Memo::new(move |_| carousel.with(|c| c.auto_advance_key(auto_slide)));
    Effect::new(move |_| {
        auto_advance.get().map(|_| {
            Interval::new(DEFAULT_SLIDE_INTERVAL_MS, move || {
                carousel.update(|c| {
                    c.next();
                });
            })
        })
    });

    let on_transition_end = move |_| {
        let snapped = carousel.try_update(|c| c.transition_end()).unwrap_or(false);
        if snapped {
            Timeout::new(RESUME_DELAY_MS, move || {
                carousel.update(|c| c.resume_animation());
            })
            .forget();
        }
    };

    let track_style = move || {
        carousel.with(|c| {
            let transition = if c.is_animating() {
                "transform 0.5s ease-in-out"
            } else {
                "none"
            };
            format!(
                "width: {}%; transform: translateX(-{}%); transition: {transition};",
                c.track_len() * 100,
                c.offset_percent()
            )
        })
    };

    let slide_style = format!("width: {}%;", 100.0 / track.len().max(1) as f64);
    let slides = track
        .into_iter()
        .map(|slide| {
            let cells = slide
                .into_iter()
                .map(|cell| match cell {
                    Some(post) => {
                        let href = routes::post_href(&category, &post.subcategory, post.id);
                        let image_style = if post.thumbnail.is_empty() {
                            String::new()
                        } else {
                            format!("background-image: url('{}');", post.thumbnail)
                        };
                        view! {
                            <A href=href attr:class="featured-post">
                                <div class="featured-image" style=image_style></div>
                                <p>{post.title}</p>
                            </A>
                        }
                        .into_any()
                    }
                    None => view! { <div class="featured-empty"></div> }.into_any(),
                })
                .collect_view();
            view! { <div class="featured-page" style=slide_style.clone()>{cells}</div> }
        })
        .collect_view();

    let dots = (1..=total_pages)
        .map(|page| {
            view! {
                <span
                    class=move || {
                        if carousel.with(|c| c.real_page()) == page { "dot active" } else { "dot" }
                    }
                    on:click=move |_| {
                        carousel.update(|c| {
                            c.go_to(page);
                        });
                    }
                ></span>
            }
        })
        .collect_view();

    let prev = move |_| {
        carousel.update(|c| {
            c.prev();
        });
    };
    let next = move |_| {
        carousel.update(|c| {
            c.next();
        });
    };

    view! {
        <section
            class="featured card"
            on:mouseenter=move |_| carousel.update(|c| c.set_paused(true))
            on:mouseleave=move |_| carousel.update(|c| c.set_paused(false))
        >
            <h2 class="section-title">{category.clone()}</h2>
            {if total_pages == 0 {
                view! { <p class="empty">"Постов пока нет"</p> }.into_any()
            } else {
                view! {
                    <div class="featured-wrapper">
                        {show_nav.then(|| view! { <button class="nav-btn" on:click=prev>"◀"</button> })}
                        <div class="featured-slider">
                            <div class="featured-track" style=track_style on:transitionend=on_transition_end>
                                {slides}
                            </div>
                        </div>
                        {show_nav.then(|| view! { <button class="nav-btn" on:click=next>"▶"</button> })}
                    </div>
                    {show_dots.then(|| view! { <div class="dots">{dots}</div> })}
                }
                .into_any()
            }}
        </section>
    }
}
