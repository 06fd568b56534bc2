//! The navigation bar shared by the pages behind the auth guard.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }
}

/// The navigation bar.
pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::NEW_INCOME_VIEW,
                title: "Add income",
                is_current: active_endpoint == endpoints::NEW_INCOME_VIEW,
            },
            Link {
                url: endpoints::NEW_EXPENSE_VIEW,
                title: "Add expense",
                is_current: active_endpoint == endpoints::NEW_EXPENSE_VIEW,
            },
            Link {
                url: endpoints::LOG_OUT,
                title: "Log out",
                is_current: false,
            },
        ];

        NavBar { links }
    }

    /// Render the navigation bar.
    pub fn into_html(self) -> Markup {
        html! {
            nav class="bg-white border-gray-200 dark:bg-gray-900 w-full"
            {
                div class="max-w-(--breakpoint-xl) flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="flex items-center space-x-3 rtl:space-x-reverse text-2xl
                            font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Skarbnyk"
                    }

                    div class="w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4 border
                                border-gray-100 rounded-lg bg-gray-50 lg:flex-row
                                lg:space-x-8 rtl:space-x-reverse lg:mt-0 lg:border-0
                                lg:bg-white dark:bg-gray-800 lg:dark:bg-gray-900
                                dark:border-gray-700"
                        {
                            @for list_item in self.links
                            {
                                li { (list_item.into_html()) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use scraper::{Html, Selector};

    use crate::endpoints;

    use super::NavBar;

    #[test]
    fn contains_links_to_all_sections() {
        let markup = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
        let html = Html::parse_fragment(&markup.into_string());
        let selector = Selector::parse("a").unwrap();

        let hrefs: Vec<&str> = html
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .collect();

        for endpoint in [
            endpoints::DASHBOARD_VIEW,
            endpoints::NEW_INCOME_VIEW,
            endpoints::NEW_EXPENSE_VIEW,
            endpoints::LOG_OUT,
        ] {
            assert!(hrefs.contains(&endpoint), "missing link to {endpoint}");
        }
    }
}
