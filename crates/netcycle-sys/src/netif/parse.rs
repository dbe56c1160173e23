use netcycle_base::InterfaceRecord;

/// `interface show interface` 输出开头固定的表头行数（空行、列标题、分隔线）。
pub const HEADER_LINES: usize = 3;

const STATUS_COLUMNS: usize = 3;

/// 解析 `netsh interface show interface` 的表格输出。
///
/// 前三行无条件跳过，空行也计入这三行（netsh 输出以空行开头）。之后每一行按空白切分，
/// 前三列（管理状态、连接状态、类型）丢弃，其余列用单个空格重新拼成网卡名称。
/// 不足四列的行视为噪声，静默忽略。行分隔符接受 `\r\n`、`\n` 和单独的 `\r`。
#[must_use]
pub fn parse_show_interface(output: &str) -> Vec<InterfaceRecord> {
    split_lines(output)
        .skip(HEADER_LINES)
        .filter_map(parse_row)
        .collect()
}

fn split_lines(output: &str) -> impl Iterator<Item = &str> {
    output
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

fn parse_row(line: &str) -> Option<InterfaceRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() <= STATUS_COLUMNS {
        return None;
    }
    Some(InterfaceRecord::new(parts[STATUS_COLUMNS..].join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\r\n\
Admin State    State          Type             Interface Name\r\n\
-------------------------------------------------------------------------\r\n\
Enabled        Connected      Dedicated        Ethernet\r\n\
Disabled       Disconnected   Dedicated        Wi-Fi\r\n\
Enabled            Connected        Dedicated       Local Area Connection 2\r\n\
\r\n";

    fn names(records: &[InterfaceRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn parses_netsh_table_in_order() {
        let got = parse_show_interface(SAMPLE);
        assert_eq!(
            names(&got),
            ["Ethernet", "Wi-Fi", "Local Area Connection 2"]
        );
        assert_eq!(parse_show_interface(SAMPLE), got);
    }

    #[test]
    fn header_only_output_is_empty() {
        let out = "\nAdmin State    State          Type             Interface Name\n----------\n";
        assert!(parse_show_interface(out).is_empty());
        assert!(parse_show_interface("").is_empty());
    }

    #[test]
    fn header_is_skipped_even_when_it_looks_like_a_row() {
        let out = "a b c d\ne f g h\ni j k l\nEnabled Connected Dedicated Ethernet\n";
        assert_eq!(names(&parse_show_interface(out)), ["Ethernet"]);
    }

    #[test]
    fn collapses_whitespace_inside_names() {
        let out = "\n\n\nEnabled            Connected        Dedicated       Local Area Connection 2";
        assert_eq!(
            names(&parse_show_interface(out)),
            ["Local Area Connection 2"]
        );

        let out = "\n\n\nEnabled\tConnected\tDedicated\tvEthernet   (Default    Switch)  ";
        assert_eq!(
            names(&parse_show_interface(out)),
            ["vEthernet (Default Switch)"]
        );
    }

    #[test]
    fn short_rows_are_dropped() {
        let out = "\n\n\nEnabled Connected Dedicated\nEnabled Connected Dedicated Ethernet\n   \nx\n";
        assert_eq!(names(&parse_show_interface(out)), ["Ethernet"]);
    }

    #[test]
    fn blank_lines_count_toward_the_header() {
        let out = "\n\n\nEnabled Connected Dedicated Ethernet";
        assert_eq!(names(&parse_show_interface(out)), ["Ethernet"]);
    }

    #[test]
    fn bare_carriage_returns_separate_lines() {
        let out = "\rAdmin State    State          Type             Interface Name\r\
-----------------\r\
Enabled        Connected      Dedicated        Ethernet\r\
Disabled       Disconnected   Dedicated        Wi-Fi\r";
        assert_eq!(names(&parse_show_interface(out)), ["Ethernet", "Wi-Fi"]);
        assert_eq!(
            parse_show_interface(out),
            parse_show_interface(&out.replace('\r', "\r\n"))
        );
    }

    #[test]
    fn status_columns_are_not_validated() {
        let out = "\n\n\nAktiviert Verbunden Dediziert Ethernet 3\n";
        assert_eq!(names(&parse_show_interface(out)), ["Ethernet 3"]);
    }
}
