//! Terminal output.
//!
//! Renders analysis records and split results as bordered panels. Every
//! function returns the text instead of printing it.

use crate::processing::{AnalysisRecord, HostRange, ScopeFlag, SplitSummary};
use crate::models::Family;
use colored::{Color, ColoredString, Colorize};
use itertools::Itertools;

const LABEL_WIDTH: usize = 12;

/// Pad a value to `width` characters, left-aligned.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    format!("{value_str:<width$}")
}

/// Insert thousands separators into a decimal string.
pub fn group_digits(digits: &str) -> String {
    let len = digits.len();
    digits
        .chars()
        .enumerate()
        .fold(String::with_capacity(len + len / 3), |mut out, (i, c)| {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
            out
        })
}

/// One line of panel content: its visible width and its coloured form.
struct Line {
    width: usize,
    styled: String,
}

impl Line {
    fn plain(text: &str) -> Line {
        Line {
            width: text.chars().count(),
            styled: text.to_string(),
        }
    }

    fn styled(text: &str, styled: ColoredString) -> Line {
        Line {
            width: text.chars().count(),
            styled: styled.to_string(),
        }
    }

    /// A `Label:  value` row.
    fn row(label: &str, value: &str, styled: ColoredString) -> Line {
        let label = format_field(format!("{label}:"), LABEL_WIDTH);
        Line {
            width: label.chars().count() + 2 + value.chars().count(),
            styled: format!("{}  {}", label.bold().cyan(), styled),
        }
    }
}

/// Draw a rounded panel around `lines` with `title` in the top border.
fn panel(title: &str, lines: &[Line], border: Color) -> String {
    let title_width = title.chars().count();
    let inner = lines
        .iter()
        .map(|l| l.width)
        .max()
        .unwrap_or(0)
        .max(title_width + 1);

    let mut out = String::new();
    let fill = "─".repeat(inner + 2 - title_width - 3);
    out.push_str(&format!("{}{}{}\n", "╭─ ".color(border), title.bold(), format!(" {fill}╮").color(border)));

    let blank = Line::plain("");
    for line in std::iter::once(&blank).chain(lines).chain(std::iter::once(&blank)) {
        out.push_str(&format!(
            "{} {}{} {}\n",
            "│".color(border),
            line.styled,
            " ".repeat(inner - line.width),
            "│".color(border)
        ));
    }
    out.push_str(&format!("{}\n", format!("╰{}╯", "─".repeat(inner + 2)).color(border)));
    out
}

fn flag_color(flag: ScopeFlag) -> ColoredString {
    let name = flag.name();
    match flag {
        ScopeFlag::Private => name.green(),
        ScopeFlag::Global => name.blue(),
        ScopeFlag::Loopback => name.yellow(),
        ScopeFlag::Multicast | ScopeFlag::Reserved => name.red(),
        _ => name.dimmed(),
    }
}

/// Render the information panel of one network.
pub fn render_info(record: &AnalysisRecord) -> String {
    let mut lines = Vec::new();
    let version = record.version.to_string();
    lines.push(Line::row("Version", &version, version.bold().magenta()));

    let addresses = group_digits(&record.total_addresses.to_string());
    lines.push(Line::row("Addresses", &addresses, addresses.bold().yellow()));
    lines.push(Line::row("Subnet", &record.cidr, record.cidr.bold().green()));
    lines.push(Line::row("Netmask", &record.netmask, record.netmask.normal()));
    lines.push(Line::row("Hostmask", &record.hostmask, record.hostmask.normal()));
    if record.version == Family::V6 {
        lines.push(Line::row("Expanded", &record.expanded, record.expanded.dimmed()));
    }
    lines.push(Line::row("Network", &record.network, record.network.bold().blue()));
    lines.push(Line::row("Broadcast", &record.broadcast, record.broadcast.bold().blue()));

    match &record.hosts {
        HostRange::Single { host } => lines.push(Line::row("Host", host, host.bold().cyan())),
        HostRange::Range { first, last } => {
            let text = format!("{first} to {last}");
            let styled = format!("{} to {}", first.bold().cyan(), last.bold().cyan());
            lines.push(Line::row("Hosts", &text, styled.normal()));
        }
    }

    if let Some(hex) = &record.hexadecimal {
        lines.push(Line::row("Hexadecimal", hex, hex.bold().yellow()));
    }

    if !record.flags.is_empty() {
        let text = record.flags.to_string();
        let styled = record.flags.iter().map(flag_color).join(" ");
        lines.push(Line::row("Flags", &text, styled.normal()));
    }

    panel(
        &format!("Network Information: {}", record.cidr),
        &lines,
        Color::BrightBlue,
    )
}

/// Render the table of a split, showing at most `max_displayed` rows.
pub fn render_split(summary: &SplitSummary, max_displayed: usize) -> String {
    let headers = ["Prefixes", "Nbr of hosts", "Range of hosts"];
    let rows: Vec<[String; 3]> = summary
        .subnets
        .iter()
        .take(max_displayed)
        .map(|s| {
            [
                s.cidr.clone(),
                group_digits(&s.usable_hosts.to_string()),
                s.hosts.to_string(),
            ]
        })
        .collect();

    let widths: Vec<usize> = (0..3)
        .map(|col| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(headers[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = |left: &str, mid: &str, right: &str| {
        let text = format!(
            "{left}{}{right}",
            widths.iter().map(|w| "─".repeat(w + 2)).join(mid)
        );
        Line::styled(&text, text.cyan())
    };

    let mut lines = vec![border("╭", "┬", "╮")];
    let header = format!(
        "│ {} │ {} │ {} │",
        format_field(headers[0], widths[0]),
        format!("{:^w$}", headers[1], w = widths[1]),
        format_field(headers[2], widths[2])
    );
    lines.push(Line::styled(&header, header.bold()));
    lines.push(border("├", "┼", "┤"));

    for row in &rows {
        let cidr = format_field(&row[0], widths[0]);
        let hosts = format!("{:^w$}", row[1], w = widths[1]);
        let range = format_field(&row[2], widths[2]);
        let text = format!("│ {cidr} │ {hosts} │ {range} │");
        let bar = "│".cyan();
        let styled = format!(
            "{bar} {} {bar} {} {bar} {} {bar}",
            cidr.color(Color::Cyan),
            hosts.magenta(),
            range.yellow()
        );
        lines.push(Line::styled(&text, styled.normal()));
    }
    lines.push(border("╰", "┴", "╯"));

    if summary.total_subnets > rows.len() {
        let note = format!("... Only showing first {} subnets ...", rows.len());
        lines.push(Line::styled(&note, note.dimmed().yellow()));
    }

    panel(
        &format!(
            "Total: {} subnets",
            group_digits(&summary.total_subnets.to_string())
        ),
        &lines,
        Color::Cyan,
    )
}

/// Render an error panel.
pub fn render_error(title: &str, message: &str, suggestion: Option<&str>) -> String {
    let mut lines = vec![Line::styled(message, message.bold().red())];
    if let Some(suggestion) = suggestion {
        lines.push(Line::plain(""));
        lines.push(Line::styled(suggestion, suggestion.dimmed().yellow()));
    }
    panel(title, &lines, Color::Red)
}

/// Render the list of commands shown when none is given.
pub fn render_commands() -> String {
    let commands = [
        ("info", "Display comprehensive network information"),
        ("split", "Split networks into smaller subnets"),
        ("examples", "Show usage examples"),
    ];
    let mut lines = vec![Line::styled("Available commands:", "Available commands:".bold().yellow())];
    for (name, help) in commands {
        let text = format!("• {} - {help}", format_field(name, 8));
        let styled = format!("{} {} - {help}", "•".dimmed(), format_field(name, 8).bold().green());
        lines.push(Line::styled(&text, styled.normal()));
    }
    lines.push(Line::plain(""));
    lines.push(Line::plain("Use --help with any command for detailed information."));
    panel("IPv4 and IPv6 Subnet Calculator", &lines, Color::BrightBlue)
}

/// Render usage examples for `program`.
pub fn render_examples(program: &str) -> String {
    let info = [
        "172.16.0.1/21",
        "10.1.2.0/255.255.255.0",
        "10.1.2.0 255.255.255.0",
        "2001:1:2:3::0/64",
        "2001:1:2:3::0 64",
    ];
    let split = [
        "2001:1:2:3::0/64 --mask 68",
        "192.168.1.0/24 --count 8",
    ];

    let mut lines = vec![Line::styled(
        "Display subnet information:",
        "Display subnet information:".bold().cyan(),
    )];
    for args in info {
        let text = format!("→ {program} info {args}");
        let styled = format!("{} {} {}", "→".dimmed(), format!("{program} info").green(), args.yellow());
        lines.push(Line::styled(&text, styled.normal()));
    }
    lines.push(Line::plain(""));
    lines.push(Line::styled("Split subnets:", "Split subnets:".bold().cyan()));
    for args in split {
        let text = format!("→ {program} split {args}");
        let styled = format!("{} {} {}", "→".dimmed(), format!("{program} split").green(), args.yellow());
        lines.push(Line::styled(&text, styled.normal()));
    }
    panel("Examples", &lines, Color::Cyan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_network;
    use crate::processing::{analyze, split_summary, SplitRequest};

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_field() {
        assert_eq!(format_field("test", 6), "test  ");
        assert_eq!(format_field("long_value", 5), "long_value");
        assert_eq!(format_field(42, 4), "42  ");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1"), "1");
        assert_eq!(group_digits("256"), "256");
        assert_eq!(group_digits("4096"), "4,096");
        assert_eq!(group_digits("1048576"), "1,048,576");
        assert_eq!(
            group_digits("18446744073709551616"),
            "18,446,744,073,709,551,616"
        );
    }

    #[test]
    fn test_render_info_ipv4() {
        no_color();
        let text = render_info(&analyze(&parse_network("192.168.1.0/24").unwrap()));
        assert!(text.contains("Network Information: 192.168.1.0/24"));
        assert!(text.contains("Addresses:    256"));
        assert!(text.contains("Hosts:        192.168.1.1 to 192.168.1.254"));
        assert!(text.contains("Hexadecimal:  C0A80100"));
        assert!(text.contains("Flags:        PRIVATE"));
        assert!(!text.contains("Expanded:"));
    }

    #[test]
    fn test_render_info_ipv6() {
        no_color();
        let text = render_info(&analyze(&parse_network("2001:1:2:3::/64").unwrap()));
        assert!(text.contains("Addresses:    18,446,744,073,709,551,616"));
        assert!(text.contains("Expanded:     2001:0001:0002:0003:0000:0000:0000:0000/64"));
        assert!(!text.contains("Hexadecimal:"));
    }

    #[test]
    fn test_render_info_single_host() {
        no_color();
        let text = render_info(&analyze(&parse_network("192.168.1.5/32").unwrap()));
        assert!(text.contains("Host:         192.168.1.5"));
    }

    #[test]
    fn test_panel_lines_align() {
        no_color();
        let text = render_info(&analyze(&parse_network("10.0.0.0/8").unwrap()));
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{text}");
    }

    #[test]
    fn test_render_split_overflow() {
        no_color();
        let network = parse_network("10.0.0.0/24").unwrap();
        let summary = split_summary(&network, SplitRequest::ByPrefixLength(30), 1024).unwrap();
        let text = render_split(&summary, 3);
        assert!(text.contains("Total: 64 subnets"));
        assert!(text.contains("10.0.0.8/30"));
        assert!(!text.contains("10.0.0.12/30"));
        assert!(text.contains("... Only showing first 3 subnets ..."));
        assert!(text.contains("10.0.0.9 to 10.0.0.10"));
    }

    #[test]
    fn test_render_split_all_rows() {
        no_color();
        let network = parse_network("192.168.1.0/24").unwrap();
        let summary = split_summary(&network, SplitRequest::ByCount(2), 1024).unwrap();
        let text = render_split(&summary, 50);
        assert!(text.contains("192.168.1.128/25"));
        assert!(!text.contains("Only showing"));
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{text}");
    }

    #[test]
    fn test_render_error() {
        no_color();
        let text = render_error("ParseError", "Invalid address foo", Some("Try again"));
        assert!(text.contains("ParseError"));
        assert!(text.contains("Invalid address foo"));
        assert!(text.contains("Try again"));
    }

    #[test]
    fn test_render_examples() {
        no_color();
        let text = render_examples("ipnet");
        assert!(text.contains("→ ipnet info 172.16.0.1/21"));
        assert!(text.contains("→ ipnet split 192.168.1.0/24 --count 8"));
        assert!(render_commands().contains("examples"));
    }
}
