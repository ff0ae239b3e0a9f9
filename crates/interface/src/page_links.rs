/// One element of a rendered page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// A directly linkable page index.
    Link(usize),
    /// The page currently shown, not a link.
    Current(usize),
    /// A collapsed run of indices.
    Gap,
}

/// Computes which page indices to expose as direct links around
/// `selected`, collapsing long runs into gaps.
///
/// The strip always carries the first links up to `min(selected, 3)`, up
/// to three links either side of the current page, and the final three
/// indices; a run of more than five skipped indices collapses into a
/// single gap. The element count stays bounded no matter how many pages
/// exist.
pub fn page_links(total_pages: usize, selected: usize) -> Vec<PageLink> {
    let mut links = Vec::new();
    let mut index = 0;

    while index < selected && index < 3 {
        links.push(PageLink::Link(index));
        index += 1;
    }
    if index + 5 < selected {
        links.push(PageLink::Gap);
        index = selected - 3;
    }
    while index < selected {
        links.push(PageLink::Link(index));
        index += 1;
    }

    links.push(PageLink::Current(index));
    index += 1;

    while index < total_pages && index < selected + 4 {
        links.push(PageLink::Link(index));
        index += 1;
    }
    if index + 5 < total_pages {
        links.push(PageLink::Gap);
        index = total_pages - 3;
    }
    while index < total_pages {
        links.push(PageLink::Link(index));
        index += 1;
    }

    links
}
