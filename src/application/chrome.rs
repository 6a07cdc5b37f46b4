use crate::application::clock::SiteClock;
use crate::presentation::views::{BrandView, FooterView, LayoutChrome, NavigationLinkView};

/// Builds the shared page chrome (brand, navigation, footer) for every template.
#[derive(Clone)]
pub struct ChromeService {
    title: String,
    clock: SiteClock,
}

impl ChromeService {
    pub fn new(title: impl Into<String>, clock: SiteClock) -> Self {
        Self {
            title: title.into(),
            clock,
        }
    }

    pub fn load(&self) -> LayoutChrome {
        let year = self.clock.current_year();

        LayoutChrome {
            brand: BrandView {
                title: self.title.clone(),
                href: "/".to_string(),
            },
            navigation: vec![
                NavigationLinkView::new("Home", "/"),
                NavigationLinkView::new("About", "/about"),
                NavigationLinkView::new("Contact", "/contact"),
                NavigationLinkView::new("New Post", "/new-post"),
            ],
            footer: FooterView {
                copy: format!("Copyright © {} {year}", self.title),
            },
            year,
        }
    }
}
