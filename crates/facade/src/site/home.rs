//! Home page template: hero banner, content cards and an article grid.

use facade_compose::{
    button_link, container, decorative_image, grid, heading, image, link, text, Border,
    Breakpoint, NodeResult, Radius, Tone,
};

struct Card {
    title: &'static str,
    body: &'static str,
    image: &'static str,
    alt: &'static str,
}

const CARDS: [Card; 3] = [
    Card {
        title: "Design system",
        body: "Accessible components that look the same on every page.",
        image: "/images/card-components.svg",
        alt: "Stack of interface components",
    },
    Card {
        title: "Static hosting",
        body: "Every route is exported ahead of time and served as plain files.",
        image: "/images/card-hosting.svg",
        alt: "Server rack",
    },
    Card {
        title: "Fast by default",
        body: "No client-side framework to download before the page is usable.",
        image: "/images/card-speed.svg",
        alt: "Speedometer",
    },
];

const ARTICLES: [(&str, &str); 4] = [
    ("Getting started", "Set up the scaffold and export your first page."),
    ("Writing content", "Compose pages from headings, text and images."),
    ("Responsive grids", "Choose column counts for each breakpoint."),
    ("Going live", "Upload the output directory to any static host."),
];

pub fn layout() -> NodeResult {
    container()
        .child(hero())
        .child(cards())
        .child(articles())
        .build()
}

fn hero() -> NodeResult {
    container()
        .tone(Tone::Inverse)
        .padding(6)
        .radius(Radius::Standard)
        .child(heading(1, "Launch your next idea"))
        .child(text(
            "A ready-made home page built from the same components as the rest of your site.",
        ))
        .child(
            container()
                .child(button_link("/sign-in-form", "Create account"))
                .build(),
        )
        .child(image("/images/hero.svg", "People collaborating around a laptop"))
        .build()
}

fn cards() -> NodeResult {
    let cards = CARDS.iter().map(|card| {
        container()
            .padding(3)
            .border(Border::Standard)
            .radius(Radius::Standard)
            .child(image(card.image, card.alt))
            .child(heading(3, card.title))
            .child(text(card.body))
            .child(link("/sign-in-form", "Learn more"))
            .build()
    });

    container()
        .child(heading(2, "What you get"))
        .child(
            grid([(Breakpoint::Xs, 1), (Breakpoint::Md, 3)])
                .children(cards)
                .build(),
        )
        .build()
}

fn articles() -> NodeResult {
    let articles = ARTICLES.iter().map(|(title, summary)| {
        container()
            .tone(Tone::Shade)
            .padding(2)
            .radius(Radius::Standard)
            .child(decorative_image("/images/article.svg"))
            .child(heading(3, *title))
            .child(text(*summary))
            .build()
    });

    container()
        .child(heading(2, "Latest articles"))
        .child(
            grid([
                (Breakpoint::Xs, 1),
                (Breakpoint::Sm, 2),
                (Breakpoint::Md, 4),
            ])
            .children(articles)
            .build(),
        )
        .build()
}
