//! Benchmarks for word2backlog conversion performance.
//!
//! Run with: cargo bench
//!
//! Documents are synthetic: one heading every `SECTION` paragraphs, with a
//! small picture in every section.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;
use word2backlog::ConvertOptions;

const SECTION: usize = 10;

/// Creates a synthetic .docx with the given number of paragraphs.
fn create_test_docx(paragraph_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("word/_rels/document.xml.rels", options)
        .unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
</Relationships>"#,
    )
    .unwrap();

    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
</w:styles>"#,
    )
    .unwrap();

    zip.start_file("word/media/image1.png", options).unwrap();
    zip.write_all(&[0x89, b'P', b'N', b'G'].repeat(256)).unwrap();

    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
  xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
  xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <w:body>"#,
    );

    for i in 0..paragraph_count {
        match i % SECTION {
            0 => content.push_str(&format!(
                r#"
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Item {}</w:t></w:r></w:p>"#,
                i / SECTION
            )),
            1 => content.push_str(
                r#"
    <w:p><w:r><w:drawing><a:graphic><a:blip r:embed="rId2"/></a:graphic></w:drawing></w:r></w:p>"#,
            ),
            _ => content.push_str(&format!(
                r#"
    <w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr><w:r><w:t>This is paragraph {} with some test content for benchmarking purposes.</w:t></w:r></w:p>"#,
                i
            )),
        }
    }

    content.push_str(
        r#"
  </w:body>
</w:document>"#,
    );

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

/// Benchmark conversion to JSON at various sizes.
fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    let options = ConvertOptions::default();

    for para_count in [10, 100, 500, 1000].iter() {
        let data = create_test_docx(*para_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = word2backlog::convert_bytes(black_box(data), &options);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the paragraph walk alone, without JSON encoding.
fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");
    let options = ConvertOptions::default();

    for para_count in [100, 1000].iter() {
        let data = create_test_docx(*para_count);
        let parser = word2backlog::WordParser::from_bytes(data).unwrap();
        let paragraphs = parser.paragraphs().unwrap();

        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &paragraphs,
            |b, paragraphs| {
                b.iter(|| {
                    let _ = word2backlog::walker::walk(
                        black_box(paragraphs),
                        parser.catalog(),
                        &parser.images(),
                        &options,
                    );
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_convert, bench_walk);
criterion_main!(benches);
