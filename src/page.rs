//! Queries against the notebook file-tree page.

use url::Url;

use crate::core::listing::{filter_labels, Item};
use crate::driver::{Browser, ElementRef, Locator};
use crate::error::{HarnessError, PageError, Result};
use crate::server::NotebookServerInfo;
use crate::wait::{wait_for_selector, WaitConfig};

pub const ITEM_LINK_CLASS: &str = "item_link";
pub const ITEM_NAME_CLASS: &str = "item_name";
pub const SORT_BUTTON_CLASS: &str = "sort_button";

/// A clickable sort button and its position among the page's sort buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortControl {
    pub index: usize,
    pub element: ElementRef,
}

impl SortControl {
    pub fn click(&self, browser: &dyn Browser) -> Result<()> {
        browser.click(&self.element)
    }
}

/// True when `url` is on the server's tree view. Origins are compared normalized, so
/// default ports and host case do not matter.
pub fn url_in_tree(server: &NotebookServerInfo, url: &str) -> bool {
    let (Ok(tree), Ok(current)) = (Url::parse(&server.tree_url()), Url::parse(url)) else {
        return false;
    };
    current.origin() == tree.origin() && current.path().starts_with(tree.path())
}

pub fn open_tree(browser: &dyn Browser, server: &NotebookServerInfo) -> Result<()> {
    let url = server.authenticated_tree_url()?;
    tracing::debug!(url = %server.tree_url(), "Opening file tree");
    browser.goto(&url)
}

/// Reads the labels of every listed item, in rendered order.
///
/// Fails with [`PageError::NotInTreeView`] unless the browser is on the tree view, and with
/// [`PageError::NoItemsRendered`] if no item shows up before the wait times out.
pub fn get_list_items(
    browser: &dyn Browser,
    server: &NotebookServerInfo,
    wait: &WaitConfig,
) -> Result<Vec<Item>> {
    let url = browser.current_url()?;
    if !url_in_tree(server, &url) {
        return Err(PageError::NotInTreeView { url }.into());
    }

    let item_link = Locator::class(ITEM_LINK_CLASS);
    if wait_for_selector(browser, &item_link, wait)?.is_none() {
        return Err(PageError::NoItemsRendered {
            timeout: wait.timeout,
        }
        .into());
    }

    // re-query: the listing may have grown since the wait first saw it
    let name = Locator::class(ITEM_NAME_CLASS);
    let mut items = Vec::new();
    for link in browser.find_elements(&item_link)? {
        let Some(name_el) = browser.find_child_elements(&link, &name)?.into_iter().next() else {
            return Err(HarnessError::webdriver(
                "find item name",
                format!("listed item {link} has no {name} element"),
            ));
        };
        items.push(Item::new(browser.text(&name_el)?));
    }
    Ok(items)
}

pub fn get_sort_buttons(browser: &dyn Browser) -> Result<Vec<SortControl>> {
    Ok(browser
        .find_elements(&Locator::class(SORT_BUTTON_CLASS))?
        .into_iter()
        .enumerate()
        .map(|(index, element)| SortControl { index, element })
        .collect())
}

/// The rendered order of `labels`, ignoring every other item.
pub fn current_order<S: AsRef<str>>(
    browser: &dyn Browser,
    server: &NotebookServerInfo,
    wait: &WaitConfig,
    labels: &[S],
) -> Result<Vec<String>> {
    let items = get_list_items(browser, server, wait)?;
    Ok(filter_labels(&items, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockBrowser;
    use mockall::predicate::eq;
    use std::time::Duration;

    fn server() -> NotebookServerInfo {
        NotebookServerInfo::new("http://localhost:8888/", Some("tok".to_string()))
    }

    fn quick() -> WaitConfig {
        WaitConfig::new(Duration::from_millis(30), Duration::from_millis(5))
    }

    fn el(id: &str) -> ElementRef {
        ElementRef(id.to_string())
    }

    #[test]
    fn test_url_in_tree() {
        let server = server();
        assert!(url_in_tree(&server, "http://localhost:8888/tree"));
        assert!(url_in_tree(&server, "http://localhost:8888/tree/sub?token=x"));
        assert!(!url_in_tree(&server, "http://localhost:8888/notebooks/a.ipynb"));
        assert!(!url_in_tree(&server, "http://localhost:9999/tree"));
        assert!(!url_in_tree(&server, "not a url"));
    }

    #[test]
    fn test_url_in_tree_normalizes_origin() {
        let explicit_port = NotebookServerInfo::new("http://Notebooks.Example:80/", None);
        assert!(url_in_tree(&explicit_port, "http://notebooks.example/tree"));

        let upper = NotebookServerInfo::new("http://LOCALHOST:8888/", None);
        assert!(url_in_tree(&upper, "http://localhost:8888/tree?token=x"));
        assert!(!url_in_tree(&upper, "https://localhost:8888/tree"));
    }

    #[test]
    fn test_get_list_items_outside_tree_is_page_error() {
        let mut browser = MockBrowser::new();
        browser
            .expect_current_url()
            .returning(|| Ok("http://localhost:8888/notebooks/x.ipynb".to_string()));
        browser.expect_find_elements().never();

        let err = get_list_items(&browser, &server(), &quick()).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Page(PageError::NotInTreeView { .. })
        ));
    }

    #[test]
    fn test_get_list_items_empty_listing_times_out() {
        let mut browser = MockBrowser::new();
        browser
            .expect_current_url()
            .returning(|| Ok("http://localhost:8888/tree".to_string()));
        browser.expect_find_elements().returning(|_| Ok(vec![]));

        let err = get_list_items(&browser, &server(), &quick()).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Page(PageError::NoItemsRendered { .. })
        ));
    }

    #[test]
    fn test_get_list_items_reads_names_in_order() {
        let mut browser = MockBrowser::new();
        browser
            .expect_current_url()
            .returning(|| Ok("http://localhost:8888/tree".to_string()));
        browser
            .expect_find_elements()
            .with(eq(Locator::class(ITEM_LINK_CLASS)))
            .returning(|_| Ok(vec![el("l1"), el("l2")]));
        browser
            .expect_find_child_elements()
            .with(mockall::predicate::always(), eq(Locator::class(ITEM_NAME_CLASS)))
            .returning(|parent, _| Ok(vec![ElementRef(format!("n{}", &parent.0[1..]))]));
        browser.expect_text().returning(|e| {
            Ok(match e.0.as_str() {
                "n1" => "My Notebook 2.ipynb".to_string(),
                _ => "a.txt".to_string(),
            })
        });

        let items = get_list_items(&browser, &server(), &quick()).unwrap();
        assert_eq!(
            items,
            vec![Item::new("My Notebook 2.ipynb"), Item::new("a.txt")]
        );
    }

    #[test]
    fn test_get_list_items_row_without_name_is_error() {
        let mut browser = MockBrowser::new();
        browser
            .expect_current_url()
            .returning(|| Ok("http://localhost:8888/tree".to_string()));
        browser
            .expect_find_elements()
            .returning(|_| Ok(vec![el("l1"), el("l2")]));
        browser
            .expect_find_child_elements()
            .returning(|parent, _| match parent.0.as_str() {
                "l1" => Ok(vec![]),
                _ => Ok(vec![el("n2")]),
            });
        browser
            .expect_text()
            .returning(|_| Ok("a.txt".to_string()));

        let err = get_list_items(&browser, &server(), &quick()).unwrap_err();
        match err {
            HarnessError::WebDriver { command, message } => {
                assert_eq!(command, "find item name");
                assert!(message.contains("l1"));
            }
            other => panic!("expected a WebDriver error, got {other:?}"),
        }
    }

    #[test]
    fn test_get_sort_buttons_indexes_in_order() {
        let mut browser = MockBrowser::new();
        browser
            .expect_find_elements()
            .with(eq(Locator::class(SORT_BUTTON_CLASS)))
            .returning(|_| Ok(vec![el("name"), el("modified"), el("size")]));

        let buttons = get_sort_buttons(&browser).unwrap();
        assert_eq!(buttons.len(), 3);
        assert_eq!(buttons[1].index, 1);
        assert_eq!(buttons[1].element, el("modified"));
    }

    #[test]
    fn test_sort_control_click_delegates() {
        let mut browser = MockBrowser::new();
        browser
            .expect_click()
            .with(eq(el("name")))
            .times(1)
            .returning(|_| Ok(()));

        let control = SortControl {
            index: 0,
            element: el("name"),
        };
        control.click(&browser).unwrap();
    }

    #[test]
    fn test_open_tree_navigates_with_token() {
        let mut browser = MockBrowser::new();
        browser
            .expect_goto()
            .with(eq("http://localhost:8888/tree?token=tok"))
            .times(1)
            .returning(|_| Ok(()));

        open_tree(&browser, &server()).unwrap();
    }

    #[test]
    fn test_current_order_filters_labels() {
        let mut browser = MockBrowser::new();
        browser
            .expect_current_url()
            .returning(|| Ok("http://localhost:8888/tree".to_string()));
        browser
            .expect_find_elements()
            .returning(|_| Ok(vec![el("l1"), el("l2"), el("l3")]));
        browser
            .expect_find_child_elements()
            .returning(|parent, _| Ok(vec![ElementRef(format!("n{}", &parent.0[1..]))]));
        browser.expect_text().returning(|e| {
            Ok(match e.0.as_str() {
                "n1" => "a.txt",
                "n2" => "Untitled.ipynb",
                _ => "a",
            }
            .to_string())
        });

        let order = current_order(&browser, &server(), &quick(), &["a", "a.txt"]).unwrap();
        assert_eq!(order, vec!["a.txt", "a"]);
    }
}
