pub const DEFAULT_PROGRESS_TICKS: usize = 20;

/// Fixed-width progress line, e.g. `[##########----------] 50% (1/2 segments)`.
/// The bar width is the tick count, so the default 20 ticks give one
/// tick per 5%.
pub fn progress_text(current: usize, total: usize, ticks: usize) -> String {
    let ticks = ticks.max(1);
    let total = total.max(1);
    let current = current.min(total);

    let filled = current * ticks / total;
    let percent = current * 100 / total;

    let mut bar = String::with_capacity(ticks + 2);
    bar.push('[');
    for tick in 0..ticks {
        bar.push(if tick < filled { '#' } else { '-' });
    }
    bar.push(']');

    format!("{bar} {percent}% ({current}/{total} segments)")
}
