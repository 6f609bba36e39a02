// ==========================================
// 商城数据导入导出 - 文件写出
// ==========================================
// CSV: `;` 分隔 + 表头行（延迟记录临时文件与导出共用）
// XML: <root><{adapter}><{row}>字段元素</{row}>...</{adapter}></root>
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::WriterBuilder;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

fn write_err(e: impl std::fmt::Display) -> ImportError {
    ImportError::FileWriteError(e.to_string())
}

/// 写出 CSV 文件
pub fn write_csv(path: &Path, headers: &[String], rows: &[Vec<String>]) -> ImportResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .map_err(write_err)?;

    writer.write_record(headers).map_err(write_err)?;
    for row in rows {
        writer.write_record(row).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;
    Ok(())
}

/// 写出 XML 文件
pub fn write_xml(
    path: &Path,
    adapter: &str,
    row_element: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> ImportResult<()> {
    let file = File::create(path).map_err(write_err)?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("root")))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new(adapter)))
        .map_err(write_err)?;

    for row in rows {
        writer
            .write_event(Event::Start(BytesStart::new(row_element)))
            .map_err(write_err)?;
        for (header, cell) in headers.iter().zip(row.iter()) {
            writer
                .write_event(Event::Start(BytesStart::new(header.as_str())))
                .map_err(write_err)?;
            writer
                .write_event(Event::Text(BytesText::new(cell)))
                .map_err(write_err)?;
            writer
                .write_event(Event::End(BytesEnd::new(header.as_str())))
                .map_err(write_err)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(row_element)))
            .map_err(write_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(adapter)))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("root")))
        .map_err(write_err)?;
    Ok(())
}
