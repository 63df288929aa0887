//! Expressions evaluated inside the page.
//!
//! Each returns plain JSON whose keys match the entry types in
//! `perfscope_core::metrics::entries`.

/// Navigation, paint, layout-shift and resource entries
pub const SNAPSHOT: &str = r#"(() => {
    const nav = performance.getEntriesByType('navigation')[0];
    return {
        navigation: nav ? {
            domainLookupStart: nav.domainLookupStart,
            domainLookupEnd: nav.domainLookupEnd,
            connectStart: nav.connectStart,
            connectEnd: nav.connectEnd,
            secureConnectionStart: nav.secureConnectionStart,
            requestStart: nav.requestStart,
            responseStart: nav.responseStart,
            domContentLoadedEventStart: nav.domContentLoadedEventStart,
            domContentLoadedEventEnd: nav.domContentLoadedEventEnd,
            loadEventStart: nav.loadEventStart,
            loadEventEnd: nav.loadEventEnd
        } : null,
        paint: performance.getEntriesByType('paint').map(e => ({
            name: e.name,
            startTime: e.startTime
        })),
        layoutShifts: performance.getEntriesByType('layout-shift').map(e => ({
            value: e.value,
            hadRecentInput: e.hadRecentInput
        })),
        resources: performance.getEntriesByType('resource').map(r => ({
            name: r.name,
            initiatorType: r.initiatorType,
            duration: r.duration,
            transferSize: Math.round(r.transferSize || 0)
        }))
    };
})()"#;

/// Install a buffered `largest-contentful-paint` observer that queues entries
/// on `window.__perfscopeLcp`. Replaces an observer left by an earlier call.
pub const LCP_OBSERVE: &str = r#"(() => {
    const previous = window.__perfscopeLcp;
    if (previous) {
        previous.observer.disconnect();
    }
    const toEntry = (entry) => {
        const el = entry.element;
        return {
            startTime: entry.startTime,
            size: Math.round(entry.size || 0),
            loadTime: entry.loadTime || 0,
            renderTime: entry.renderTime || 0,
            element: el ? {
                tagName: el.tagName || '',
                id: el.id || '',
                className: typeof el.className === 'string' ? el.className : '',
                src: el.src || '',
                textContent: (el.textContent || '').substring(0, 500)
            } : null
        };
    };
    const queue = [];
    const observer = new PerformanceObserver((list) => {
        for (const entry of list.getEntries()) {
            queue.push(toEntry(entry));
        }
    });
    observer.observe({ type: 'largest-contentful-paint', buffered: true });
    window.__perfscopeLcp = { observer, queue, toEntry };
    return true;
})()"#;

/// Queued entries from index `from` on; the queue is left intact
pub fn lcp_drain(from: usize) -> String {
    format!(
        r#"(() => {{
    const state = window.__perfscopeLcp;
    return state ? state.queue.slice({from}) : [];
}})()"#
    )
}

/// Stop observing. Records the observer had not dispatched yet are queued
/// first, then every entry from index `from` on is returned.
pub fn lcp_disconnect(from: usize) -> String {
    format!(
        r#"(() => {{
    const state = window.__perfscopeLcp;
    if (!state) {{
        return [];
    }}
    for (const record of state.observer.takeRecords()) {{
        state.queue.push(state.toEntry(record));
    }}
    state.observer.disconnect();
    delete window.__perfscopeLcp;
    return state.queue.slice({from});
}})()"#
    )
}

/// Identity and load progress of the current document
pub const DOCUMENT_STATE: &str = r#"(() => ({
    timeOrigin: performance.timeOrigin,
    readyState: document.readyState,
    resourceCount: performance.getEntriesByType('resource').length
}))()"#;
