// ==========================================
// 商城数据导入导出 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: CSV (.csv) / XML (.xml)
// ==========================================

use crate::domain::FileFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawRow};
use csv::ReaderBuilder;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs;
use std::path::Path;

/// 读取文件文本（去掉 UTF-8 BOM）
fn read_text(path: &Path) -> ImportResult<String> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    Ok(content.trim_start_matches('\u{feff}').to_string())
}

/// 扩展名校验（无扩展名的临时文件放行）
fn check_extension(path: &Path, expected: FileFormat) -> ImportResult<()> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if FileFormat::from_extension(ext) != Some(expected) {
            return Err(ImportError::UnsupportedFormat(ext.to_string()));
        }
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 根据表头行猜测分隔符（`;` 优先，其次 `,`）
    pub fn sniff_delimiter(content: &str) -> u8 {
        let header = content.lines().next().unwrap_or("");
        let semicolons = header.matches(';').count();
        let commas = header.matches(',').count();
        if semicolons >= commas && semicolons > 0 {
            b';'
        } else {
            b','
        }
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_extension(file_path, FileFormat::Csv)?;
        let content = read_text(file_path)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .delimiter(Self::sniff_delimiter(&content))
            .from_reader(content.as_bytes());

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: RawRow = record
                .iter()
                .enumerate()
                .filter_map(|(col_idx, value)| {
                    headers
                        .get(col_idx)
                        .map(|header| (header.clone(), value.trim().to_string()))
                })
                .collect();

            // 跳过完全空白的行
            if row.iter().all(|(_, v)| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// XML Parser 实现
// ==========================================
// 行识别规则: 子元素全部为纯文本元素、且名称为行元素名的元素即为一行
// 例: <root><articles><article><ordernumber>SW1</ordernumber></article></articles></root>
// 未指定行元素名时，任何满足纯文本子元素规则的元素都视为一行
#[derive(Debug, Clone, Default)]
pub struct XmlParser {
    row_element: Option<String>,
}

#[derive(Default)]
struct ElementFrame {
    name: String,
    text: String,
    fields: RawRow,       // 纯文本子元素
    has_nested: bool,     // 存在带子元素的子元素
}

impl ElementFrame {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }
}

impl XmlParser {
    /// 只把名为 `row_element` 的元素识别为行
    pub fn with_row_element(row_element: impl Into<String>) -> Self {
        Self {
            row_element: Some(row_element.into()),
        }
    }

    fn is_row_name(&self, name: &str) -> bool {
        self.row_element.as_deref().map_or(true, |row| row == name)
    }

    fn close_element(&self, stack: &mut Vec<ElementFrame>, rows: &mut Vec<RawRow>) {
        let Some(frame) = stack.pop() else {
            return;
        };

        let is_text_only = frame.fields.is_empty() && !frame.has_nested;
        if is_text_only {
            if let Some(parent) = stack.last_mut() {
                parent.fields.push((frame.name, frame.text.trim().to_string()));
            }
            return;
        }

        if !frame.has_nested
            && self.is_row_name(&frame.name)
            && !frame.fields.iter().all(|(_, v)| v.is_empty())
        {
            rows.push(frame.fields);
        }
        if let Some(parent) = stack.last_mut() {
            parent.has_nested = true;
        }
    }
}

impl FileParser for XmlParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_extension(file_path, FileFormat::Xml)?;
        let content = read_text(file_path)?;

        let mut reader = Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<ElementFrame> = Vec::new();
        let mut rows = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    stack.push(ElementFrame::named(name));
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    stack.push(ElementFrame::named(name));
                    self.close_element(&mut stack, &mut rows);
                }
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| ImportError::XmlParseError(e.to_string()))?;
                    if let Some(frame) = stack.last_mut() {
                        frame.text.push_str(&text);
                    }
                }
                Event::CData(c) => {
                    if let Some(frame) = stack.last_mut() {
                        frame.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::End(_) => self.close_element(&mut stack, &mut rows),
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(ImportError::XmlParseError(format!(
                "元素未闭合: {}",
                stack.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join("/")
            )));
        }

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match FileFormat::from_extension(&ext) {
            Some(format) => self.parse_as(path, format, None),
            None => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    /// 按指定格式解析（忽略扩展名）
    ///
    /// `row_element` 仅对 XML 生效，限定行元素名
    pub fn parse_as(
        &self,
        path: &Path,
        format: FileFormat,
        row_element: Option<&str>,
    ) -> ImportResult<Vec<RawRow>> {
        match format {
            FileFormat::Csv => CsvParser.parse_to_raw_rows(path),
            FileFormat::Xml => {
                let parser = row_element.map_or_else(XmlParser::default, XmlParser::with_row_element);
                parser.parse_to_raw_rows(path)
            }
        }
    }
}
